use anyhow::Result;
use chrono::Datelike;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

use crate::page::{HtmlTemplate, RenderOutcome, render_page};
use crate::runtime::Runtime;

use super::config::Config;
use super::services::{build_http_client, build_loader};

/// Options for the `render` command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub template: PathBuf,
    pub config: Option<PathBuf>,
    pub site_root: Option<PathBuf>,
    /// Write here instead of stdout
    pub out: Option<PathBuf>,
}

/// Render release information into an HTML template
#[tracing::instrument(skip(runtime))]
pub async fn render<R: Runtime + 'static>(
    runtime: R,
    options: RenderOptions,
) -> Result<RenderOutcome> {
    let config = Config::load(
        &runtime,
        options.config.as_deref(),
        options.site_root.clone(),
        Some(&options.template),
    )?;

    debug!("Reading template {:?}", options.template);
    let mut page = HtmlTemplate::parse(runtime.read_to_string(&options.template)?)?;

    let runtime = Arc::new(runtime);
    let year = chrono::Local::now().year();

    let outcome = match &config.page {
        Some(page_config) => {
            let loader = build_loader(runtime.clone(), build_http_client()?, &config, page_config);
            render_page(&mut page, Some((page_config, &loader)), year).await?
        }
        None => render_page(&mut page, None, year).await?,
    };

    let html = page.to_html()?;
    match &options.out {
        Some(out) => {
            runtime.write(out, html.as_bytes())?;
            info!("Wrote {:?}", out);
        }
        None => print!("{}", html),
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedKind;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::Path;

    const TEMPLATE: &str = r#"<span id="hero-version"></span><div id="changelog-entries"></div><span id="footer-year"></span>"#;

    #[tokio::test]
    async fn test_render_without_config_writes_template_unchanged() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .with(eq(PathBuf::from("/srv/site/index.html")))
            .returning(|_| Ok(TEMPLATE.to_string()));
        runtime.expect_exists().never();
        runtime
            .expect_write()
            .withf(|path, contents| {
                path == Path::new("/srv/site/out.html") && contents == TEMPLATE.as_bytes()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = render(
            runtime,
            RenderOptions {
                template: PathBuf::from("/srv/site/index.html"),
                out: Some(PathBuf::from("/srv/site/out.html")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome, RenderOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_render_from_local_feed() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .with(eq(PathBuf::from("/srv/site/index.html")))
            .returning(|_| Ok(TEMPLATE.to_string()));
        runtime
            .expect_read_to_string()
            .with(eq(PathBuf::from("/srv/site/plugin.json")))
            .returning(|_| Ok(r#"{"name": "Echo", "slug": "echo"}"#.to_string()));
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/srv/site/downloads/releases.json")))
            .returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(PathBuf::from("/srv/site/downloads/releases.json")))
            .returning(|_| {
                Ok(r#"[{"version": "1.0.0", "date": "2024-01-01", "notes": "Hello"}]"#.to_string())
            });
        runtime
            .expect_write()
            .withf(|_, contents| {
                let html = String::from_utf8_lossy(contents);
                html.contains("Latest: v1.0.0 — 2024-01-01") && html.contains("<p>Hello</p>")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = render(
            runtime,
            RenderOptions {
                template: PathBuf::from("/srv/site/index.html"),
                config: Some(PathBuf::from("/srv/site/plugin.json")),
                out: Some(PathBuf::from("/srv/site/out.html")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            RenderOutcome::Rendered {
                source: FeedKind::Local,
                releases: 1
            }
        );
    }

    #[tokio::test]
    async fn test_render_missing_template_is_an_error() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(|_| Err(anyhow::anyhow!("not found")));
        runtime.expect_write().never();

        let result = render(
            runtime,
            RenderOptions {
                template: PathBuf::from("/srv/site/index.html"),
                ..Default::default()
            },
        )
        .await;

        assert!(result.is_err());
    }
}
