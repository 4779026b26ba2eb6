//! Command-line interface definitions for Extra Extra News.
//!
//! All search options can come from flags, environment variables, or the
//! YAML options file (see [`crate::config`]). Flags and environment variables
//! win over the file; the file wins over built-in defaults.

use crate::request::OrderBy;
use clap::Parser;

/// Command-line arguments for the Extra Extra News client.
///
/// # Examples
///
/// ```sh
/// # Latest sports stories, interactive list
/// extra_extra_news --api-key YOUR_KEY
///
/// # Most relevant climate stories, print once and exit
/// extra_extra_news -t climate -o relevance --once
///
/// # Open the third result straight away
/// extra_extra_news -t cricket --open 3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search topic (free text)
    #[arg(short, long, env = "NEWS_TOPIC")]
    pub topic: Option<String>,

    /// Sort order of the results
    #[arg(short, long, value_enum, env = "NEWS_ORDER_BY")]
    pub order_by: Option<OrderBy>,

    /// Number of results to request
    #[arg(short = 'n', long, env = "NEWS_PAGE_SIZE", value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Content API key
    #[arg(long, env = "GUARDIAN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Extra result fields to request, comma separated
    #[arg(long, value_delimiter = ',')]
    pub show_fields: Option<Vec<String>>,

    /// Result tags to request, comma separated
    #[arg(long, value_delimiter = ',')]
    pub show_tags: Option<Vec<String>>,

    /// Search endpoint to query
    #[arg(long, env = "GUARDIAN_BASE_URL")]
    pub base_url: Option<String>,

    /// Optional path to the config.yaml options file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print the list once and exit instead of prompting
    #[arg(long)]
    pub once: bool,

    /// Open the article on this row after loading, then exit
    #[arg(long, value_name = "ROW")]
    pub open: Option<usize>,

    /// Skip the connectivity check and always try the request
    #[arg(long)]
    pub no_probe: bool,

    /// Write the loaded list as JSON into this directory
    #[arg(long)]
    pub json_output_dir: Option<String>,

    /// Write the loaded list as Markdown into this directory
    #[arg(long)]
    pub markdown_output_dir: Option<String>,

    /// Terminal width used to fit titles
    #[arg(long, default_value_t = crate::presentation::DEFAULT_WIDTH)]
    pub width: usize,

    /// HTTP connect timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub connect_timeout: u64,

    /// HTTP read timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub read_timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["extra_extra_news"]);

        assert!(cli.topic.is_none());
        assert!(!cli.once);
        assert_eq!(cli.width, 80);
        assert_eq!(cli.connect_timeout, 15);
        assert_eq!(cli.read_timeout, 10);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "extra_extra_news",
            "-t",
            "climate",
            "-o",
            "relevance",
            "-n",
            "25",
        ]);

        assert_eq!(cli.topic.as_deref(), Some("climate"));
        assert_eq!(cli.order_by, Some(OrderBy::Relevance));
        assert_eq!(cli.page_size, Some(25));
    }

    #[test]
    fn test_cli_comma_separated_lists() {
        let cli = Cli::parse_from([
            "extra_extra_news",
            "--show-fields",
            "byline,thumbnail",
            "--show-tags",
            "contributor",
        ]);

        assert_eq!(
            cli.show_fields,
            Some(vec!["byline".to_string(), "thumbnail".to_string()])
        );
        assert_eq!(cli.show_tags, Some(vec!["contributor".to_string()]));
    }

    #[test]
    fn test_cli_rejects_zero_page_size() {
        let res = Cli::try_parse_from(["extra_extra_news", "--page-size", "0"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_order() {
        let res = Cli::try_parse_from(["extra_extra_news", "--order-by", "sideways"]);
        assert!(res.is_err());
    }
}
