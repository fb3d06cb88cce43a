use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use forumline_core::api::{ForumApi, Navigator, RequestEnvelope, SessionedClient};
use forumline_core::auth::{open_store, CredentialBackend};
use forumline_core::config::Config;
use forumline_core::models::{
    MessageQuery, NewThread, ProfileUpdate, Reaction, ThreadQuery, ThreadUpdate,
};
use tracing::{debug, warn};

use crate::views;
use crate::Command;

/// Shown by the navigator when the backend rejects the stored token.
const SESSION_EXPIRED_NOTICE: &str = "Session expired, run `forumline login` to sign in again.";

/// Terminal stand-in for redirecting to the login page.
fn login_navigator() -> Arc<dyn Navigator> {
    Arc::new(|login_path: &str| {
        debug!(login_path, "Redirecting to login");
        eprintln!("{}", SESSION_EXPIRED_NOTICE);
    })
}

pub struct App {
    config: Config,
    api: ForumApi,
}

impl App {
    /// Build the app from the saved config, environment, then flags.
    pub fn new(api_url: Option<&str>, store: Option<CredentialBackend>) -> Result<Self> {
        let mut config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Failed to load config, using defaults");
                Config::default()
            }
        };
        config.apply_env_overrides();
        if let Some(url) = api_url {
            config.api_base_url = url.to_string();
        }
        if let Some(backend) = store {
            config.credential_backend = backend;
        }
        debug!(api = %config.api_base_url, backend = ?config.credential_backend, "Config loaded");

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        let store = open_store(config.credential_backend, &cache_dir);
        let client = SessionedClient::from_config(&config, store)?.with_navigator(login_navigator());

        Ok(Self {
            config,
            api: ForumApi::new(client),
        })
    }

    /// Refuse authenticated-only commands up front when no token is stored.
    fn require_login(&self) -> Result<()> {
        if self.api.client().has_credential() {
            Ok(())
        } else {
            bail!("Not logged in. Run `forumline login` first.")
        }
    }

    pub async fn run(mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { username } => self.login(username).await,
            Command::Register { username, email } => self.register(username, email).await,
            Command::Logout => {
                self.api.logout();
                println!("Logged out.");
                Ok(())
            }
            Command::Whoami => {
                match self.api.current_user() {
                    Some(claims) => print!("{}", views::claims(&claims)),
                    None => println!("Not logged in."),
                }
                Ok(())
            }
            Command::Threads {
                page,
                per_page,
                status,
            } => {
                let query = ThreadQuery {
                    page,
                    per_page,
                    status,
                    ..Default::default()
                };
                let threads = self.api.list_threads(&query).await?;
                print!("{}", views::thread_list(&threads));
                Ok(())
            }
            Command::Search {
                query,
                page,
                per_page,
            } => {
                let threads = self.api.search_threads(&query, page, per_page).await?;
                print!("{}", views::thread_list(&threads));
                Ok(())
            }
            Command::Show { id, sort, page } => {
                let query = MessageQuery {
                    page,
                    sort_by: sort,
                    ..Default::default()
                };
                let (detail, messages) =
                    futures::try_join!(self.api.get_thread(id), self.api.list_messages(id, &query))?;
                print!("{}", views::thread_detail(&detail, &messages));
                Ok(())
            }
            Command::NewThread {
                title,
                description,
                tags,
            } => {
                self.require_login()?;
                let thread = NewThread {
                    title,
                    description,
                    tags: clean_tags(tags),
                };
                let created = self.api.create_thread(&thread).await?;
                println!("Created thread #{}.", created.id);
                Ok(())
            }
            Command::EditThread {
                id,
                title,
                description,
                tags,
                status,
            } => {
                self.require_login()?;
                let current = self.api.get_thread(id).await?;
                let mut update = ThreadUpdate::from(&current.thread);
                if let Some(title) = title {
                    update.title = title;
                }
                if let Some(description) = description {
                    update.description = description;
                }
                if let Some(tags) = tags {
                    update.tags = clean_tags(tags);
                }
                update.status = status;
                let updated = self.api.update_thread(id, &update).await?;
                println!("Updated thread #{}.", updated.id);
                Ok(())
            }
            Command::DeleteThread { id, yes } => {
                self.require_login()?;
                if !yes && !confirm(&format!("Delete thread #{}?", id))? {
                    println!("Cancelled.");
                    return Ok(());
                }
                let message = self.api.delete_thread(id).await?;
                println!("{}", message.unwrap_or_else(|| format!("Deleted thread #{}.", id)));
                Ok(())
            }
            Command::Reply { thread_id, content } => {
                self.require_login()?;
                let content = match content {
                    Some(c) => c,
                    None => read_stdin()?,
                };
                let message = self.api.create_message(thread_id, &content).await?;
                println!("Posted message #{}.", message.id);
                Ok(())
            }
            Command::Like { message_id } => self.react(message_id, Reaction::Like).await,
            Command::Dislike { message_id } => self.react(message_id, Reaction::Dislike).await,
            Command::Profile => {
                self.require_login()?;
                let user = self.api.profile().await?;
                print!("{}", views::profile(&user));
                Ok(())
            }
            Command::EditProfile {
                username,
                email,
                picture,
                bio,
            } => {
                self.require_login()?;
                let update = ProfileUpdate {
                    username,
                    email,
                    profile_picture: picture,
                    biography: bio,
                };
                let user = self.api.update_profile(&update).await?;
                print!("{}", views::profile(&user));
                Ok(())
            }
            Command::Mine { messages } => {
                self.require_login()?;
                if messages {
                    let items = self.api.user_messages().await?;
                    println!("{}", serde_json::to_string_pretty(&items)?);
                } else {
                    let threads = self.api.user_threads().await?;
                    print!("{}", views::thread_list(&threads));
                }
                Ok(())
            }
            Command::Stats => {
                let stats = self.api.stats().await?;
                print!("{}", views::stats(&stats));
                Ok(())
            }
            Command::Call {
                method,
                endpoint,
                body,
            } => {
                let body = body
                    .map(|b| serde_json::from_str(&b).context("--body must be valid JSON"))
                    .transpose()?;
                let request = RequestEnvelope::new(endpoint, method).with_body(body);
                let envelope = self.api.client().send(request).await?;
                println!("{}", serde_json::to_string_pretty(&envelope)?);
                Ok(())
            }
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    async fn login(&mut self, username: Option<String>) -> Result<()> {
        let username = match username.filter(|u| !u.trim().is_empty()) {
            Some(u) => u,
            None => prompt_username(self.config.last_username.as_deref())?,
        };
        let password = rpassword::prompt_password("Password: ")?;

        let session = self.api.login(&username, &password).await?;
        let display = session
            .user
            .map(|u| u.username)
            .unwrap_or_else(|| username.trim().to_string());

        self.config.last_username = Some(username.trim().to_string());
        if let Err(e) = self.config.save() {
            warn!(error = %format!("{:#}", e), "Failed to save config");
        }

        if self.config.credential_backend == CredentialBackend::Memory {
            println!("Logged in as {} (memory store: session ends with this process).", display);
        } else {
            println!("Logged in as {}.", display);
        }
        Ok(())
    }

    async fn register(&mut self, username: Option<String>, email: Option<String>) -> Result<()> {
        let username = match username {
            Some(u) => u,
            None => prompt("Username")?,
        };
        let email = match email {
            Some(e) => e,
            None => prompt("Email")?,
        };
        let password = rpassword::prompt_password("Password: ")?;
        let confirmation = rpassword::prompt_password("Confirm password: ")?;
        if password != confirmation {
            bail!("Passwords do not match");
        }

        let user = self.api.register(&username, &email, &password).await?;
        let name = user.map(|u| u.username).unwrap_or_else(|| username.trim().to_string());

        self.config.last_username = Some(name.clone());
        if let Err(e) = self.config.save() {
            warn!(error = %format!("{:#}", e), "Failed to save config");
        }

        if self.api.client().has_credential() {
            println!("Registered and logged in as {}.", name);
        } else {
            println!("Registered {}. Run `forumline login` to sign in.", name);
        }
        Ok(())
    }

    async fn react(&self, message_id: i64, reaction: Reaction) -> Result<()> {
        self.require_login()?;
        let confirmation = self.api.react(message_id, reaction).await?;
        println!(
            "{}",
            confirmation.unwrap_or_else(|| format!("Recorded {} on message #{}.", reaction, message_id))
        );
        Ok(())
    }
}

/// Trim tags and drop empties left by stray commas.
fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_username(last_username: Option<&str>) -> Result<String> {
    match last_username {
        Some(last) => {
            let input = prompt(&format!("Username [{}]", last))?;
            Ok(if input.is_empty() { last.to_string() } else { input })
        }
        None => prompt("Username"),
    }
}

fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{} [y/N]", question))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read message from stdin")?;
    Ok(content)
}
