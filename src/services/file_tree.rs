use std::cmp::Ordering;

/// A node of the project tree shown next to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNode {
    Folder {
        name: String,
        path: String,
        children: Vec<FileNode>,
    },
    File {
        name: String,
        path: String,
    },
}

impl FileNode {
    pub fn name(&self) -> &str {
        match self {
            FileNode::Folder { name, .. } | FileNode::File { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FileNode::Folder { path, .. } | FileNode::File { path, .. } => path,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, FileNode::Folder { .. })
    }
}

/// Group `/`-separated paths into a folder/file tree.
///
/// At every level folders come before files, and siblings are ordered by
/// name ignoring case (byte order breaks ties).
pub fn build_tree<'a, I>(paths: I) -> Vec<FileNode>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut root = Vec::new();
    for path in paths {
        insert_path(&mut root, path);
    }
    sort_nodes(&mut root);
    root
}

fn insert_path(root: &mut Vec<FileNode>, path: &str) {
    let parts: Vec<&str> = path.split('/').collect();
    let mut level = root;

    for (index, part) in parts.iter().enumerate() {
        if index == parts.len() - 1 {
            let exists = level
                .iter()
                .any(|node| !node.is_folder() && node.name() == *part);
            if !exists {
                level.push(FileNode::File {
                    name: part.to_string(),
                    path: path.to_string(),
                });
            }
            return;
        }

        let position = level
            .iter()
            .position(|node| node.is_folder() && node.name() == *part);
        let position = match position {
            Some(position) => position,
            None => {
                level.push(FileNode::Folder {
                    name: part.to_string(),
                    path: parts[..=index].join("/"),
                    children: Vec::new(),
                });
                level.len() - 1
            }
        };

        level = match &mut level[position] {
            FileNode::Folder { children, .. } => children,
            FileNode::File { .. } => unreachable!("position always refers to a folder"),
        };
    }
}

fn sort_nodes(nodes: &mut [FileNode]) {
    nodes.sort_by(compare_nodes);
    for node in nodes.iter_mut() {
        if let FileNode::Folder { children, .. } = node {
            sort_nodes(children);
        }
    }
}

fn compare_nodes(a: &FileNode, b: &FileNode) -> Ordering {
    match (a.is_folder(), b.is_folder()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name()
            .to_lowercase()
            .cmp(&b.name().to_lowercase())
            .then_with(|| a.name().cmp(b.name())),
    }
}
