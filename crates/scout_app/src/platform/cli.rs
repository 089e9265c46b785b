use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use scout_core::MediaFilter;

#[derive(Parser, Debug)]
#[command(
    name = "scout",
    version,
    about = "Find media and documents on disk, or harvest resources from a web page"
)]
pub(crate) struct Cli {
    /// Settings file (RON). Defaults to ./.scout.ron
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print events as JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Log file path. Defaults to ./scout.log
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Also log to stderr; repeat for more detail
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Scan for images and videos
    Media {
        /// Which media kinds to report
        #[arg(long, value_enum, default_value_t = MediaKindArg::All)]
        kind: MediaKindArg,

        /// Stop after this many items
        #[arg(long)]
        max_items: Option<usize>,

        /// Directories to scan; every volume when omitted
        roots: Vec<PathBuf>,
    },
    /// Scan for Word, Excel, PowerPoint and PDF files
    Documents {
        /// Stop after this many items
        #[arg(long)]
        max_items: Option<usize>,

        /// Directories to scan; every volume when omitted
        roots: Vec<PathBuf>,
    },
    /// Find files whose name contains a query, ignoring case
    Find {
        query: String,

        /// Directory levels to list below each root
        #[arg(short, long)]
        depth: Option<usize>,

        /// Directories to search; every volume when omitted
        roots: Vec<PathBuf>,
    },
    /// Fetch one page and list the images, videos and links it references
    Crawl {
        /// Page URL; https:// is assumed when no scheme is given
        url: String,
    },
    /// Save one resource into the download directory
    Download {
        url: String,

        /// Target directory instead of the configured one
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

impl Command {
    /// Worker label, used in thread names and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Command::Media { .. } => "media",
            Command::Documents { .. } => "documents",
            Command::Find { .. } => "find",
            Command::Crawl { .. } => "crawl",
            Command::Download { .. } => "download",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum MediaKindArg {
    All,
    Image,
    Video,
}

impl From<MediaKindArg> for MediaFilter {
    fn from(arg: MediaKindArg) -> Self {
        match arg {
            MediaKindArg::All => MediaFilter::All,
            MediaKindArg::Image => MediaFilter::Image,
            MediaKindArg::Video => MediaFilter::Video,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn media_defaults_to_all_kinds() {
        let cli = Cli::try_parse_from(["scout", "media", "/photos"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Media {
                kind: MediaKindArg::All,
                max_items: None,
                roots: vec![PathBuf::from("/photos")],
            }
        );
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "scout", "find", "report", "-d", "2", "--json", "-vv", "/a", "/b",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Command::Find {
                query: "report".into(),
                depth: Some(2),
                roots: vec![PathBuf::from("/a"), PathBuf::from("/b")],
            }
        );
    }

    #[test]
    fn media_kind_maps_to_filter() {
        let cli = Cli::try_parse_from(["scout", "media", "--kind", "video"]).unwrap();
        let Command::Media { kind, roots, .. } = cli.command else {
            panic!("expected media command");
        };
        assert_eq!(MediaFilter::from(kind), MediaFilter::Video);
        assert!(roots.is_empty());
    }

    #[test]
    fn crawl_requires_a_url() {
        assert!(Cli::try_parse_from(["scout", "crawl"]).is_err());
    }
}
