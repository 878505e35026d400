use clap::Parser;
use colored::Colorize;
use link_preview::{
    is_github_url, log_error_card, log_preview_card, setup_logging, LinkPreview, LogConfig, PreviewError,
    PreviewService, PreviewServiceConfig,
};
use std::error::Error;

/// Prints link previews for the given URLs.
#[derive(Parser, Debug)]
#[command(name = "preview_cli")]
struct Args {
    /// URLs to preview
    #[arg(required = true)]
    urls: Vec<String>,

    /// Resolve GitHub repository URLs through the GitHub API
    #[arg(long)]
    github: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn print_preview(preview: &LinkPreview) {
    println!("\n{}", "Link Preview".bold().blue());
    println!("{}", "---------------".blue());
    println!("{}: {}", "URL".bold(), preview.url);
    println!("{}: {}", "Title".bold(), preview.title);

    if !preview.description.is_empty() {
        let description: String = preview.description.chars().take(100).collect();
        println!("{}: {}", "Description".bold(), description);
    }
    if !preview.image.is_empty() {
        println!("{}: {}", "Image".bold(), preview.image);
    }
    println!("{}: {}", "Site Name".bold(), preview.site_name);
    println!("{}: {}", "Type".bold(), preview.content_type);
    println!("{}: {}", "Favicon".bold(), preview.favicon_url);

    log_preview_card(preview);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();

    setup_logging(LogConfig {
        log_level: args.log_level.clone(),
        ..Default::default()
    })?;

    let service = PreviewService::new_with_config(PreviewServiceConfig::from_env());

    for url in &args.urls {
        if args.github && is_github_url(url) {
            match service.fetch_github_repo(url).await {
                Ok(repo) => {
                    println!("\n{}", "GitHub Repository".bold().green());
                    println!("{}", "---------------".green());
                    println!("{}: {}", "Name".bold(), repo.name);
                    println!("{}: {}", "Description".bold(), repo.description);
                    println!("{}: {}", "Stars".bold(), repo.stars);
                    println!("{}: {}", "Language".bold(), repo.language);
                    println!("{}: {}", "Topics".bold(), repo.topics.join(", "));
                    if !repo.demo_url.is_empty() {
                        println!("{}: {}", "Homepage".bold(), repo.demo_url);
                    }
                    continue;
                }
                Err(e) => {
                    log_error_card(url, &e);
                    eprintln!("{}", "GitHub lookup failed, using generic preview".yellow());
                }
            }
        }

        match service.generate_preview(url).await {
            Ok(preview) => print_preview(&preview),
            Err(e) => {
                let error = PreviewError::from(e);
                error.log();
                eprintln!("{}: {} - {}", "Error".bold().red(), url, error.public_message());
            }
        }
    }

    Ok(())
}
