use anyhow::Result;
use clap::Parser;
use log::info;
use relpage::commands::{RenderOptions, ShowOptions, render, show};
use std::path::PathBuf;

/// relpage - Release Page Renderer
///
/// Fill a product page with release information: a hero version badge,
/// per-platform download buttons and cards, and a changelog.
///
/// Releases are read from the page's local releases.json first and fall back
/// to the GitHub releases API configured for the page.
///
/// Examples:
///   relpage render site/echo/index.html --config site/echo/plugin.json --out site/echo/index.html
///   relpage show --config site/echo/plugin.json
#[derive(Parser, Debug)]
#[command(author, version = env!("RELPAGE_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Page configuration (JSON). Without it no release data is rendered.
    #[arg(
        long = "config",
        short = 'c',
        env = "RELPAGE_CONFIG",
        value_name = "FILE",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// Site root for relative feed paths (defaults to the template's directory)
    #[arg(long = "site-root", value_name = "DIR", global = true)]
    pub site_root: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Render release information into an HTML page
    Render(RenderArgs),

    /// Show the release feed a page would be rendered from
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// HTML template to fill in
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Write the rendered page here instead of stdout
    #[arg(long = "out", short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Print the releases as JSON
    #[arg(long)]
    pub json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = relpage::runtime::RealRuntime;

    match cli.command {
        Commands::Render(args) => {
            let outcome = render(
                runtime,
                RenderOptions {
                    template: args.template,
                    config: cli.config,
                    site_root: cli.site_root,
                    out: args.out,
                },
            )
            .await?;
            info!("Render finished: {:?}", outcome);
        }
        Commands::Show(args) => {
            show(
                runtime,
                ShowOptions {
                    config: cli.config,
                    site_root: cli.site_root,
                    json: args.json,
                },
            )
            .await?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_render_parsing() {
        let cli = Cli::try_parse_from(["relpage", "render", "index.html"]).unwrap();
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.template, PathBuf::from("index.html"));
                assert_eq!(args.out, None);
            }
            _ => panic!("Expected Render command"),
        }
        assert_eq!(cli.site_root, None);
    }

    #[test]
    fn test_cli_render_out_and_config() {
        let cli = Cli::try_parse_from([
            "relpage",
            "render",
            "index.html",
            "--out",
            "dist/index.html",
            "--config",
            "plugin.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.out, Some(PathBuf::from("dist/index.html")));
            }
            _ => panic!("Expected Render command"),
        }
        assert_eq!(cli.config, Some(PathBuf::from("plugin.json")));
    }

    #[test]
    fn test_cli_show_parsing() {
        let cli =
            Cli::try_parse_from(["relpage", "--site-root", "/srv/site", "show", "--json"]).unwrap();
        match cli.command {
            Commands::Show(args) => assert!(args.json),
            _ => panic!("Expected Show command"),
        }
        assert_eq!(cli.site_root, Some(PathBuf::from("/srv/site")));
    }

    #[test]
    fn test_cli_render_requires_template() {
        assert!(Cli::try_parse_from(["relpage", "render"]).is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["relpage"]).is_err());
    }
}
