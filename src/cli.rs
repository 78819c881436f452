//! Command line arguments for the `packstudio` binary.
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Default directory holding `Studio Settings.yaml`.
pub const DEFAULT_CONFIG_DIR: &str = "Pack Studio Data";

#[derive(Parser, Debug)]
#[command(
    name = "packstudio",
    version,
    about = "Assemble and disassemble Bedrock behavior pack archives",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Directory containing Studio Settings.yaml
    #[arg(long, value_name = "DIR", default_value = DEFAULT_CONFIG_DIR, global = true)]
    pub config_dir: Utf8PathBuf,

    /// Log at debug level regardless of the settings file
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    New(NewArgs),
    Export(ExportArgs),
    Import(ImportArgs),
    Apply(ApplyArgs),
    Manifest(ManifestArgs),
    Tree(TreeArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Create a project directory with a manifest and starter script")]
pub struct NewArgs {
    /// Project directory to create
    #[arg(value_name = "DIR")]
    pub dir: Utf8PathBuf,

    /// Pack name; defaults to the name in the settings file
    #[arg(long)]
    pub name: Option<String>,

    /// Pack author; defaults to the author in the settings file
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Pack a project directory into an .mcpack archive")]
pub struct ExportArgs {
    /// Project directory
    #[arg(value_name = "DIR")]
    pub dir: Utf8PathBuf,

    /// Output directory; defaults to the export directory in the settings file
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<Utf8PathBuf>,

    /// PNG to use as the pack icon
    #[arg(long, value_name = "PNG")]
    pub icon: Option<Utf8PathBuf>,

    /// Extra texture filed under textures/<NAME>.png (repeatable)
    #[arg(long = "texture", value_name = "NAME=PNG", value_parser = parse_texture_arg)]
    pub textures: Vec<(String, Utf8PathBuf)>,
}

#[derive(Parser, Debug)]
#[command(about = "Unpack an .mcpack or .zip archive into a project directory")]
pub struct ImportArgs {
    /// Archive to read
    #[arg(value_name = "ARCHIVE")]
    pub archive: Utf8PathBuf,

    /// Directory to write the project files into
    #[arg(value_name = "DIR")]
    pub dir: Utf8PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Merge a generation response (JSON) into a project directory")]
pub struct ApplyArgs {
    /// Project directory
    #[arg(value_name = "DIR")]
    pub dir: Utf8PathBuf,

    /// File holding the provider's JSON response
    #[arg(value_name = "RESPONSE")]
    pub response: Utf8PathBuf,

    /// File holding a base64 image payload to use as the pack icon
    #[arg(long, value_name = "FILE")]
    pub icon_payload: Option<Utf8PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Print the manifest generated for a project or for the default pack")]
pub struct ManifestArgs {
    /// Project directory; without one the settings' default pack is used
    #[arg(value_name = "DIR")]
    pub dir: Option<Utf8PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "List a project directory as a folder tree")]
pub struct TreeArgs {
    /// Project directory
    #[arg(value_name = "DIR")]
    pub dir: Utf8PathBuf,
}

fn parse_texture_arg(value: &str) -> Result<(String, Utf8PathBuf), String> {
    match value.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), Utf8PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=PNG, got {:?}", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_texture_arg() {
        assert_eq!(
            parse_texture_arg("sword=art/sword.png").unwrap(),
            ("sword".to_string(), Utf8PathBuf::from("art/sword.png"))
        );
        assert!(parse_texture_arg("sword").is_err());
        assert!(parse_texture_arg("=a.png").is_err());
    }

    #[test]
    fn test_export_args() {
        let args = RootArgs::try_parse_from([
            "packstudio",
            "export",
            "proj",
            "-o",
            "dist",
            "--texture",
            "a=a.png",
            "--texture",
            "b=b.png",
        ])
        .unwrap();

        let Command::Export(export) = args.command else {
            panic!("expected export");
        };
        assert_eq!(export.dir, Utf8PathBuf::from("proj"));
        assert_eq!(export.out, Some(Utf8PathBuf::from("dist")));
        assert_eq!(export.textures.len(), 2);
        assert_eq!(args.config_dir, Utf8PathBuf::from(DEFAULT_CONFIG_DIR));
    }
}
