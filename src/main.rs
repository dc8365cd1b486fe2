//! Roomchat CLI
//!
//! Terminal client for the chat backend:
//! - Log in, register, log out
//! - List and create rooms
//! - Read and send messages
//! - Interactive chat with live polling

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use roomchat::config::{generate_default_config, LoggingConfig};
use roomchat::ui::{LoginForm, LoginMode, MessageListView, RoomIntent, RoomListView};
use roomchat::{App, ClientState, Config, FileSessionStore, Room, RoomId, SessionEvents};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "roomchat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal client for a room-based chat backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Chat backend URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        username: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account and store the session
    Register {
        username: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List rooms
    Rooms,

    /// Create a room
    CreateRoom { name: String },

    /// Show a room's messages (default: first room)
    Messages {
        /// Room id, number from `rooms`, or name
        room: Option<String>,
    },

    /// Send a message
    Send {
        /// Room id, number from `rooms`, or name
        room: String,
        content: String,
    },

    /// Interactive chat
    Chat,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Session hooks for a terminal host
#[derive(Default)]
struct TerminalEvents {
    reload: Notify,
}

impl SessionEvents for TerminalEvents {
    fn notify_expired(&self, message: &str) {
        eprintln!();
        eprintln!("{}", message);
    }

    fn request_reload(&self) {
        self.reload.notify_one();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    init_tracing(&config.logging);

    let events = Arc::new(TerminalEvents::default());
    let store = Arc::new(FileSessionStore::new(&config.session.path));
    let app = App::new(config, store, events.clone())?;

    match cli.command {
        Commands::Login { username, password } => {
            authenticate(&app, LoginMode::Login, username, password).await?;
        }

        Commands::Register { username, password } => {
            authenticate(&app, LoginMode::CreateAccount, username, password).await?;
        }

        Commands::Logout { yes } => {
            if !yes && !prompt("Log out? [y/N] ")?.eq_ignore_ascii_case("y") {
                return Ok(());
            }
            app.logout().await?;
            println!("Logged out.");
        }

        Commands::Rooms => {
            require_session(&app).await?;
            app.sync().refresh_rooms().await?;
            let state = app.sync().snapshot().await;
            for line in RoomListView::new().render(&state.rooms, None) {
                println!("{}", line);
            }
        }

        Commands::CreateRoom { name } => {
            require_session(&app).await?;
            let mut form = RoomListView::new();
            form.begin_create();
            form.set_draft_name(name);
            match form.submit_create() {
                Some(RoomIntent::Create(name)) => {
                    app.sync().create_room(&name).await?;
                    println!("Created room '{}'.", name);
                }
                _ => bail!("Room name must not be blank"),
            }
        }

        Commands::Messages { room } => {
            require_session(&app).await?;
            app.sync().refresh_rooms().await?;
            if let Some(room) = room {
                let room_id = find_room(app.sync().snapshot().await, &room)?;
                app.sync().select_room(&room_id).await?;
            }

            let state = app.sync().snapshot().await;
            if state.selected_room_id.is_none() {
                println!("No rooms yet.");
                return Ok(());
            }
            let mut view = MessageListView::new(usize::MAX);
            view.apply(state.messages);
            for line in view.render() {
                println!("{}", line);
            }
        }

        Commands::Send { room, content } => {
            require_session(&app).await?;
            app.sync().refresh_rooms().await?;
            let room_id = find_room(app.sync().snapshot().await, &room)?;
            app.sync().select_room(&room_id).await?;
            app.sync().send_message(&content).await?;
            println!("Sent.");
        }

        Commands::Chat => {
            require_session(&app).await?;
            run_chat(&app, &events).await?;
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("roomchat={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn authenticate(
    app: &App,
    mode: LoginMode,
    username: String,
    password: Option<String>,
) -> anyhow::Result<()> {
    let mut form = LoginForm::new();
    form.set_mode(mode);
    form.username = username;
    form.password = match password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };

    match form.submit(app.accounts()).await {
        Some(session) => {
            let username = session.username.clone();
            app.login_succeeded(session).await?;
            println!("Logged in as {}.", username);
            Ok(())
        }
        None => bail!("{}", form.error().unwrap_or("Login failed")),
    }
}

async fn require_session(app: &App) -> anyhow::Result<()> {
    if !app.session().is_logged_in().await {
        bail!("Not logged in. Run `roomchat login <username>` first.");
    }
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn find_room(state: ClientState, query: &str) -> anyhow::Result<RoomId> {
    match resolve_room(&state.rooms, query) {
        Some(id) => Ok(id),
        None => bail!("No room matches '{}'", query),
    }
}

/// Match a room by id, then by 1-based number, then by name
fn resolve_room(rooms: &[Room], query: &str) -> Option<RoomId> {
    if let Some(room) = rooms.iter().find(|r| r.id == query) {
        return Some(room.id.clone());
    }
    if let Ok(n) = query.parse::<usize>() {
        if let Some(room) = n.checked_sub(1).and_then(|i| rooms.get(i)) {
            return Some(room.id.clone());
        }
    }
    rooms
        .iter()
        .find(|r| r.name == query)
        .map(|r| r.id.clone())
}

/// A `/room` argument naming one of `room_count` listed rooms
fn room_number(arg: &str, room_count: usize) -> Option<usize> {
    arg.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=room_count).contains(n))
}

fn room_usage(room_count: usize) -> String {
    if room_count == 0 {
        "No rooms yet. Create one with /new NAME".to_string()
    } else {
        format!("Usage: /room N, where N is 1-{}", room_count)
    }
}

const CHAT_HELP: &str = "/room N  /new NAME  /up  /down  /latest  /logout  /quit";

async fn run_chat(app: &App, events: &TerminalEvents) -> anyhow::Result<()> {
    app.start().await;

    let mut updates = app.sync().subscribe();
    let mut rooms_view = RoomListView::new();
    let viewport = app.config().ui.viewport_lines;
    let mut messages_view = MessageListView::new(viewport);
    let mut shown_room: Option<RoomId> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut state = app.sync().snapshot().await;
    redraw(app, &state, &rooms_view, &messages_view).await;

    loop {
        tokio::select! {
            _ = events.reload.notified() => {
                app.reinitialize().await;
                if !app.session().is_logged_in().await {
                    println!("Run `roomchat login <username>` to continue.");
                    return Ok(());
                }
            }

            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                state = updates.borrow_and_update().clone();

                // Snapshots coalesce; a room switch always passes through loading
                if state.selected_room_id != shown_room {
                    messages_view.apply(None);
                    shown_room = state.selected_room_id.clone();
                }
                if state.messages.as_deref() != messages_view.messages() {
                    messages_view.apply(state.messages.clone());
                }
                redraw(app, &state, &rooms_view, &messages_view).await;
            }

            line = lines.next_line() => {
                let line = match line? {
                    Some(line) => line,
                    None => return Ok(()),
                };
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                let result = match input.split_once(' ').unwrap_or((input, "")) {
                    ("/quit", _) => return Ok(()),
                    ("/logout", _) => {
                        app.logout().await?;
                        println!("Logged out.");
                        return Ok(());
                    }
                    ("/room", arg) => match room_number(arg, state.rooms.len()) {
                        Some(n) => {
                            let selected = state.selected_room_id.as_deref();
                            match rooms_view.select_index(&state.rooms, n, selected) {
                                Some(RoomIntent::Select(id)) => app.sync().select_room(&id).await,
                                _ => Ok(()),
                            }
                        }
                        None => {
                            eprintln!("{}", room_usage(state.rooms.len()));
                            Ok(())
                        }
                    },
                    ("/new", name) => {
                        rooms_view.begin_create();
                        rooms_view.set_draft_name(name);
                        match rooms_view.submit_create() {
                            Some(RoomIntent::Create(name)) => app.sync().create_room(&name).await,
                            _ => {
                                rooms_view.cancel_create();
                                eprintln!("Room name must not be blank");
                                Ok(())
                            }
                        }
                    }
                    ("/up", _) => {
                        messages_view.scroll_up(viewport / 2);
                        Ok(())
                    }
                    ("/down", _) => {
                        messages_view.scroll_down(viewport / 2);
                        Ok(())
                    }
                    ("/latest", _) => {
                        messages_view.jump_to_latest();
                        Ok(())
                    }
                    (command, _) if command.starts_with('/') => {
                        eprintln!("Commands: {}", CHAT_HELP);
                        Ok(())
                    }
                    _ => app.sync().send_message(input).await,
                };

                if let Err(e) = result {
                    eprintln!("error: {}", e);
                }
                redraw(app, &state, &rooms_view, &messages_view).await;
            }
        }
    }
}

async fn redraw(app: &App, state: &ClientState, rooms: &RoomListView, messages: &MessageListView) {
    let username = app
        .session()
        .current()
        .await
        .map(|s| s.username)
        .unwrap_or_default();

    // Clear screen, cursor home
    print!("\x1B[2J\x1B[H");
    match state.selected_room() {
        Some(room) => println!("roomchat - {} - #{}", username, room.name),
        None => println!("roomchat - {}", username),
    }
    println!("{}", "-".repeat(60));
    for line in rooms.render(&state.rooms, state.selected_room_id.as_deref()) {
        println!("{}", line);
    }
    println!("{}", "-".repeat(60));
    if state.selected_room_id.is_some() {
        for line in messages.render() {
            println!("{}", line);
        }
        println!("{}", "-".repeat(60));
    }
    println!("{}", CHAT_HELP);
    print!("> ");
    let _ = std::io::stdout().flush();
}
