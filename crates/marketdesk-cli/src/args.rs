//! Command-line parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use marketdesk_core::config::BASE_URL_ENV;
use marketdesk_core::models::Id;
use marketdesk_core::query::{ListParams, ModuleFilters};
use marketdesk_core::services::Resource;

#[derive(Debug, Parser)]
#[command(name = "marketdesk")]
#[command(about = "Command-line admin console for the marketplace backend")]
#[command(version)]
#[command(after_help = "\
Resources: countries, cities, companies, users, product-types, platform-accounts")]
pub struct Cli {
    /// Backend base URL (overrides apiBaseUrl in config.json)
    #[arg(long, global = true, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in (password is prompted)
    Login {
        /// Defaults to the last username that signed in
        username: Option<String>,
    },

    /// Sign out and forget stored tokens
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List the sections you can open
    Menu,

    /// List a collection
    #[command(after_help = "\
Examples:
  marketdesk list cities --search dou
  marketdesk list companies --inactive --page 2
  marketdesk list towns --filter countryId=4 --limit -1")]
    List {
        resource: Resource,

        #[command(flatten)]
        options: ListOptions,
    },

    /// Show one record as JSON
    Show {
        resource: Resource,
        #[arg(value_parser = parse_id)]
        id: Id,
    },

    /// Deactivate a record
    Delete {
        resource: Resource,
        #[arg(value_parser = parse_id)]
        id: Id,
    },

    /// Reactivate a record
    Restore {
        resource: Resource,
        #[arg(value_parser = parse_id)]
        id: Id,
    },

    /// Upload files and print their URLs
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Request a password reset link
    ForgotPassword { email: String },

    /// Set a new password (prompted)
    ResetPassword { token: String },
}

#[derive(Debug, Args)]
pub struct ListOptions {
    /// Search term
    #[arg(long)]
    pub search: Option<String>,

    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,

    /// Rows per page (-1 for every row)
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Show deactivated rows instead of active ones
    #[arg(long)]
    pub inactive: bool,

    /// Advanced filter, repeatable
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,
}

impl ListOptions {
    /// Options go through the same filter state a list screen keeps, so the
    /// page is applied last.
    pub fn to_list_params(&self) -> ListParams {
        let mut filters = ModuleFilters::new();
        if let Some(search) = &self.search {
            filters.set_search(search);
        }
        if self.inactive {
            filters.toggle_active();
        }
        if let Some(limit) = self.limit {
            filters.apply_filters([("limit", limit.to_string())]);
        }
        if !self.filters.is_empty() {
            filters.apply_filters(self.filters.iter().cloned());
        }
        if let Some(page) = self.page {
            filters.set_page(page);
        }
        filters.to_list_params()
    }
}

fn parse_id(value: &str) -> Result<Id, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("id must not be empty".to_string());
    }
    Ok(Id::from(value))
}

fn parse_filter(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("filter must be key=value: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(line: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("marketdesk").chain(line.split_whitespace()))
    }

    fn list_params(line: &str) -> (Resource, ListParams) {
        match parse(line).unwrap().command {
            Command::List { resource, options } => (resource, options.to_list_params()),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_login_username_is_optional() {
        match parse("login jdoe").unwrap().command {
            Command::Login { username } => assert_eq!(username.as_deref(), Some("jdoe")),
            other => panic!("expected login, got {:?}", other),
        }
        assert!(matches!(
            parse("login").unwrap().command,
            Command::Login { username: None }
        ));
    }

    #[test]
    fn test_list_defaults_to_active_rows() {
        let (resource, params) = list_params("list cities");
        assert_eq!(resource, Resource::Towns);
        assert_eq!(params.is_active, Some(true));
        assert_eq!(params.page, 1);
    }

    #[test]
    fn test_list_options() {
        let (_, params) = list_params(
            "list companies --page 3 --search sawa --inactive --limit 25 --filter countryId=4",
        );
        assert_eq!(params.search.as_deref(), Some("sawa"));
        assert_eq!(params.is_active, Some(false));
        assert_eq!(params.page, 3);
        assert_eq!(params.limit, 25);
        assert_eq!(params.filters.get("countryId").map(String::as_str), Some("4"));
    }

    #[test]
    fn test_list_accepts_every_row_limit() {
        let (_, params) = list_params("list towns --limit -1");
        assert_eq!(params.limit, -1);
    }

    #[test]
    fn test_show_parses_numeric_id() {
        match parse("show product-types 12").unwrap().command {
            Command::Show { resource, id } => {
                assert_eq!(resource, Resource::ProductTypes);
                assert_eq!(id, Id::Int(12));
            }
            other => panic!("expected show, got {:?}", other),
        }
    }

    #[test]
    fn test_kebab_case_subcommands() {
        assert!(matches!(
            parse("forgot-password m@example.com").unwrap().command,
            Command::ForgotPassword { .. }
        ));
        assert!(matches!(
            parse("reset-password tok-1").unwrap().command,
            Command::ResetPassword { .. }
        ));
    }

    #[test]
    fn test_base_url_flag() {
        let cli = parse("--base-url http://api.example whoami").unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://api.example"));
    }

    #[test]
    fn test_errors() {
        assert!(parse("").is_err());
        assert!(parse("list").is_err());
        assert!(parse("list invoices").is_err());
        assert!(parse("delete users").is_err());
        assert!(parse("list users --filter countryId").is_err());
        assert!(parse("list users --page x").is_err());
        assert!(parse("upload").is_err());
        assert!(parse("frobnicate").is_err());
    }
}
