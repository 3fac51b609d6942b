mod render;
mod repl;
mod service;

use std::cell::RefCell;
use std::io::Write as _;
use std::rc::Rc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use threads::connect::{ConnectOutcome, ConnectState, DbKind, submit_connect};
use threads::permissions::AccessRole;
use threads::timeline::system_clock;
use threads::{ChatSession, ConversationState, SessionEvent, StateCell, ThreadListState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::repl::{OpenTarget, ReplCommand};
use crate::service::ReqwestChatService;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http client init failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Failed(String),
    #[error("role `{0}` may not configure the database; rerun with --role admin")]
    Forbidden(&'static str),
    #[error("invalid connection settings:\n{0}")]
    InvalidForm(String),
    #[error("connection failed: {0}")]
    ConnectRejected(String),
    #[error("stdin read failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "datareport", about = "AI data reporting assistant CLI")]
struct Cli {
    #[arg(long, env = "DATAREPORT_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[arg(long, env = "DATAREPORT_ROLE", value_enum, default_value_t = RoleArg::Member)]
    role: RoleArg,

    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RoleArg {
    Admin,
    Member,
}

impl From<RoleArg> for AccessRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Self::Admin,
            RoleArg::Member => Self::Member,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DbTypeArg {
    Sql,
    Nosql,
}

impl From<DbTypeArg> for DbKind {
    fn from(kind: DbTypeArg) -> Self {
        match kind {
            DbTypeArg::Sql => Self::Sql,
            DbTypeArg::Nosql => Self::NoSql,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List conversations.
    Threads,
    /// Print one conversation.
    Show { thread_id: String },
    /// Send one message and print the reply.
    Send {
        #[arg(long)]
        thread: Option<String>,
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Interactive chat; opens the most recent conversation unless --thread is given.
    Chat {
        #[arg(long)]
        thread: Option<String>,
    },
    /// Configure the reporting database (admin only).
    ConnectDb(ConnectDbArgs),
}

#[derive(Args, Debug)]
struct ConnectDbArgs {
    #[arg(long, value_enum)]
    db_type: Option<DbTypeArg>,
    #[arg(long)]
    uri: Option<String>,
    #[arg(long)]
    db_name: Option<String>,
    #[arg(long)]
    collection_name: Option<String>,
}

type Session = ChatSession<ReqwestChatService, Rc<RefCell<ConversationState>>, Rc<RefCell<ThreadListState>>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let role = AccessRole::from(cli.role);
    let service = ReqwestChatService::new(&cli.base_url, Duration::from_secs(cli.timeout_secs))?;
    tracing::debug!(base_url = %cli.base_url, role = role.as_str(), "starting");

    match cli.command {
        Command::Threads => run_threads(service).await,
        Command::Show { thread_id } => run_show(service, &thread_id).await,
        Command::Send { thread, message } => run_send(service, thread.as_deref(), &message.join(" ")).await,
        Command::Chat { thread } => run_chat(service, thread.as_deref()).await,
        Command::ConnectDb(args) => run_connect_db(&service, role, args).await,
    }
}

fn new_session(service: ReqwestChatService) -> Session {
    ChatSession::new(
        service,
        Rc::new(RefCell::new(ConversationState::default())),
        Rc::new(RefCell::new(ThreadListState::default())),
        system_clock(),
    )
}

async fn run_threads(service: ReqwestChatService) -> Result<(), CliError> {
    let session = new_session(service);
    session.threads().refresh().await;
    let state = session.threads().state().borrow();
    if let Some(error) = &state.error {
        return Err(CliError::Failed(error.clone()));
    }
    print!("{}", render::render_thread_list(&state.items, state.selected_id.as_deref()));
    Ok(())
}

async fn run_show(service: ReqwestChatService, thread_id: &str) -> Result<(), CliError> {
    let session = new_session(service);
    session.open_thread(thread_id).await;
    let state = session.conversation().state().borrow();
    if let Some(error) = &state.error {
        return Err(CliError::Failed(error.clone()));
    }
    print!("{}", render::render_conversation(&state));
    Ok(())
}

async fn run_send(service: ReqwestChatService, thread_id: Option<&str>, text: &str) -> Result<(), CliError> {
    let session = new_session(service);
    if let Some(thread_id) = thread_id {
        session.open_thread(thread_id).await;
        if let Some(error) = session.conversation().state().borrow().error.clone() {
            return Err(CliError::Failed(error));
        }
    }
    let event = send_and_print(&session, text).await?;
    if let SessionEvent::ThreadCreated(thread_id) = event {
        eprintln!("thread: {thread_id}");
    }
    Ok(())
}

/// Send `text`, print the reply line, and surface failures as errors.
async fn send_and_print(session: &Session, text: &str) -> Result<SessionEvent, CliError> {
    let Some(event) = session.send(text).await else {
        return Err(CliError::Failed("message not sent: empty text or a request is still running".to_owned()));
    };
    if let SessionEvent::Failed(e) = &event {
        return Err(CliError::Failed(e.user_message()));
    }
    let last = session.conversation().state().with(|s| s.messages.last().cloned()).flatten();
    if let Some(message) = last {
        println!("{}", render::render_message(&message));
    }
    Ok(event)
}

async fn run_chat(service: ReqwestChatService, thread_id: Option<&str>) -> Result<(), CliError> {
    let session = new_session(service);
    session.start(thread_id).await;
    print!("{}", render::render_conversation(&session.conversation().state().borrow()));
    println!("{}", repl::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match repl::parse_command(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => println!("{}", repl::HELP),
            ReplCommand::Unknown(command) => println!("unknown command: {command}\n{}", repl::HELP),
            ReplCommand::New => {
                session.select_new();
                println!("Started a new conversation.");
            }
            ReplCommand::Threads => {
                session.threads().refresh().await;
                let state = session.threads().state().borrow();
                match &state.error {
                    Some(error) => println!("! {error}"),
                    None => print!("{}", render::render_thread_list(&state.items, state.selected_id.as_deref())),
                }
            }
            ReplCommand::Open(target) => {
                let opened = match target {
                    OpenTarget::Index(index) => session.select_index(index).await.is_some(),
                    OpenTarget::ThreadId(thread_id) => {
                        session.open_thread(&thread_id).await;
                        true
                    }
                };
                if opened {
                    print!("{}", render::render_conversation(&session.conversation().state().borrow()));
                } else {
                    println!("! no such conversation; run /threads to list them");
                }
            }
            ReplCommand::Rename(title) => {
                if session.rename(&title) {
                    println!("Renamed to \"{}\".", title.trim());
                }
            }
            ReplCommand::Send(text) => match send_and_print(&session, &text).await {
                Ok(SessionEvent::ThreadCreated(thread_id)) => println!("(saved as thread {thread_id})"),
                Ok(_) => {}
                Err(e) => println!("! {e}"),
            },
        }
    }
    Ok(())
}

async fn run_connect_db(service: &ReqwestChatService, role: AccessRole, args: ConnectDbArgs) -> Result<(), CliError> {
    if !role.can_configure_database() {
        return Err(CliError::Forbidden(role.as_str()));
    }

    let mut state = ConnectState::default();
    state.form.set_db_type(args.db_type.map(DbKind::from));
    state.form.set_connection_uri(args.uri.unwrap_or_default());
    state.form.set_database_name(args.db_name.unwrap_or_default());
    state.form.set_collection_name(args.collection_name.unwrap_or_default());
    let state = Rc::new(RefCell::new(state));

    match submit_connect(service, &state).await {
        Some(ConnectOutcome::Connected(message)) => {
            println!("{message}");
            Ok(())
        }
        Some(ConnectOutcome::Rejected(message)) => Err(CliError::ConnectRejected(message)),
        None => {
            let errors = state.borrow().form.validate();
            Err(CliError::InvalidForm(render::render_field_errors(&errors)))
        }
    }
}
