//! Command execution against the backend.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use marketdesk_core::access::visible_sections;
use marketdesk_core::api::{ApiClient, SessionEvent};
use marketdesk_core::auth::{AuthService, Credentials};
use marketdesk_core::config::Config;
use marketdesk_core::query::ListParams;
use marketdesk_core::services::{file_part, Resource, Services};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::args::Command;
use crate::output;

pub struct App {
    config: Config,
    auth: AuthService,
    services: Services,
    events: broadcast::Receiver<SessionEvent>,
}

impl App {
    /// `base_url` comes from `--base-url` or the environment and wins over
    /// the config file.
    pub fn new(config: Config, base_url: Option<String>) -> Result<Self> {
        let settings = config.api_settings_with(base_url);
        info!(base_url = %settings.base_url, "Using backend");
        let store = config.token_store()?;
        let api = ApiClient::new(settings, store)?;
        let events = api.subscribe();

        Ok(Self {
            config,
            auth: AuthService::new(api.clone()),
            services: Services::new(api),
            events,
        })
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        debug!(?command, "Running command");
        let result = self.dispatch(command).await;
        self.report_session_events();
        result
    }

    async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { username } => self.login(username).await?,
            Command::Logout => {
                self.auth.logout().await?;
                println!("Signed out.");
            }
            Command::Whoami => match self.auth.bootstrap().await {
                Some(user) => println!("{}", output::render_user(&user)),
                None => println!("Not signed in."),
            },
            Command::Menu => {
                let user = self.auth.bootstrap().await;
                println!("{}", output::render_menu(&visible_sections(user.as_ref())));
            }
            Command::List { resource, options } => {
                self.list(resource, &options.to_list_params()).await?
            }
            Command::Show { resource, id } => {
                let record = self.services.raw(resource).get(&id).await?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            Command::Delete { resource, id } => {
                self.services.raw(resource).delete(&id).await?;
                println!("Deactivated {} {}.", singular(resource), id);
            }
            Command::Restore { resource, id } => {
                self.services.raw(resource).restore(&id).await?;
                println!("Restored {} {}.", singular(resource), id);
            }
            Command::Upload { files } => self.upload(files).await?,
            Command::ForgotPassword { email } => {
                let message = self.auth.forgot_password(&email).await?;
                println!("{}", message.unwrap_or_else(|| "Reset link sent.".to_string()));
            }
            Command::ResetPassword { token } => self.reset_password(&token).await?,
        }
        Ok(())
    }

    async fn login(&mut self, username: Option<String>) -> Result<()> {
        let username = match username.or_else(|| self.config.last_username.clone()) {
            Some(username) => username,
            None => bail!("Username required: marketdesk login <username>"),
        };
        let password = rpassword::prompt_password(format!("Password for {}: ", username))?;

        let user = self
            .auth
            .login(&Credentials::new(username.clone(), password))
            .await?;

        self.config.last_username = Some(username.clone());
        self.config.save().context("Failed to save config")?;

        let name = user.map(|u| u.full_name()).unwrap_or(username);
        println!("Signed in as {}.", name);
        Ok(())
    }

    async fn list(&self, resource: Resource, params: &ListParams) -> Result<()> {
        let page = self.services.raw(resource).list(params).await?;
        println!("{}", output::render_page(&page));
        Ok(())
    }

    async fn upload(&self, paths: Vec<PathBuf>) -> Result<()> {
        let mut parts = Vec::with_capacity(paths.len());
        for path in &paths {
            parts.push(file_part(path).await?);
        }
        for url in self.services.files().upload_urls(parts).await? {
            println!("{}", url);
        }
        Ok(())
    }

    async fn reset_password(&self, token: &str) -> Result<()> {
        let password = rpassword::prompt_password("New password: ")?;
        let confirm = rpassword::prompt_password("Confirm password: ")?;
        if password != confirm {
            bail!("Passwords do not match");
        }
        self.auth.reset_password(token, &password).await?;
        println!("Password updated. You can now sign in.");
        Ok(())
    }

    /// Tell the user when the client had to drop the session.
    fn report_session_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::LoginRequired { reason } => {
                    eprintln!("{}. Run `marketdesk login` to sign in again.", reason);
                }
            }
        }
    }
}

/// Noun used in confirmations.
fn singular(resource: Resource) -> &'static str {
    match resource {
        Resource::Countries => "country",
        Resource::Towns => "city",
        Resource::Companies => "company",
        Resource::Users => "user",
        Resource::ProductTypes => "product type",
        Resource::PlatformAccounts => "platform account",
    }
}
