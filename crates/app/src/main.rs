mod render;

use std::fmt;
use std::sync::Arc;

use quiz_core::model::{PlayContext, QuizId, QuizVisibility, UserId};
use quiz_core::session::{NextOutcome, QuizSession};
use services::{ApiConfig, Clock, HttpQuizApi, QuizLoopService};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::render::{PlayerCommand, parse_command, render};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingQuizId,
    UnknownArg(String),
    InvalidQuizId { raw: String },
    InvalidUserId { flag: &'static str, raw: String },
    InvalidVisibility { raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingQuizId => write!(f, "--quiz-id (or QUIZ_ID) is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuizId { raw } => write!(f, "invalid --quiz-id value: {raw}"),
            ArgsError::InvalidUserId { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidVisibility { raw } => {
                write!(f, "invalid --visibility value: {raw} (public|private)")
            }
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- --quiz-id <id> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --visibility <public|private>  (default: private)");
    eprintln!("  --subject <name>               subject recorded with public results");
    eprintln!("  --title <title>");
    eprintln!("  --author-id <id> --viewer-id <id>");
    eprintln!("  --base-url <url>               (default: http://127.0.0.1:5000/)");
    eprintln!("  --seed <n>                     reproducible question order");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_ID, QUIZ_VISIBILITY, QUIZ_SUBJECT, QUIZ_TITLE, QUIZ_AUTHOR_ID,");
    eprintln!("  QUIZ_VIEWER_ID, QUIZ_BASE_URL, QUIZ_SESSION_COOKIE, RUST_LOG");
}

struct Args {
    context: PlayContext,
    base_url: Option<String>,
    seed: Option<u64>,
}

fn parse_user_id(flag: &'static str, raw: String) -> Result<UserId, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidUserId { flag, raw })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut quiz_id = env("QUIZ_ID");
        let mut visibility = env("QUIZ_VISIBILITY");
        let mut subject = env("QUIZ_SUBJECT").unwrap_or_default();
        let mut title = env("QUIZ_TITLE").unwrap_or_default();
        let mut author_id = env("QUIZ_AUTHOR_ID");
        let mut viewer_id = env("QUIZ_VIEWER_ID");
        let mut base_url = None;
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quiz-id" => quiz_id = Some(require_value(args, "--quiz-id")?),
                "--visibility" => visibility = Some(require_value(args, "--visibility")?),
                "--subject" => subject = require_value(args, "--subject")?,
                "--title" => title = require_value(args, "--title")?,
                "--author-id" => author_id = Some(require_value(args, "--author-id")?),
                "--viewer-id" => viewer_id = Some(require_value(args, "--viewer-id")?),
                "--base-url" => base_url = Some(require_value(args, "--base-url")?),
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed = value
                        .parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let raw_id = quiz_id.ok_or(ArgsError::MissingQuizId)?;
        let quiz_id: QuizId = raw_id
            .parse()
            .map_err(|_| ArgsError::InvalidQuizId { raw: raw_id.clone() })?;
        let visibility = match visibility {
            Some(raw) => raw
                .parse::<QuizVisibility>()
                .map_err(|_| ArgsError::InvalidVisibility { raw })?,
            None => QuizVisibility::Private,
        };

        let mut context = PlayContext::new(visibility, quiz_id, subject).with_title(title);
        if let Some(raw) = author_id {
            context = context.with_author(parse_user_id("--author-id", raw)?);
        }
        if let Some(raw) = viewer_id {
            context = context.with_viewer(parse_user_id("--viewer-id", raw)?);
        }

        Ok(Self {
            context,
            base_url,
            seed,
        })
    }
}

async fn read_command(
    lines: &mut Lines<BufReader<Stdin>>,
    session: &QuizSession,
) -> Result<PlayerCommand, std::io::Error> {
    loop {
        let Some(line) = lines.next_line().await? else {
            return Ok(PlayerCommand::Quit);
        };
        if let Some(command) = parse_command(&line, &session.snapshot()) {
            return Ok(command);
        }
    }
}

async fn play(
    service: &QuizLoopService,
    mut session: QuizSession,
) -> Result<(), Box<dyn std::error::Error>> {
    let title = session.context().title.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("{}", render(&title, &session.snapshot()));
        if session.is_complete() {
            return Ok(());
        }

        match read_command(&mut lines, &session).await? {
            PlayerCommand::Quit => return Ok(()),
            PlayerCommand::Answer(key) => {
                service.answer(&mut session, &key);
            }
            PlayerCommand::Next => {
                let result = service.next(&mut session)?;
                if let (NextOutcome::Complete(_), Some(report)) = (&result.outcome, result.report) {
                    // Let the stats request go out before the process exits.
                    if let Err(err) = report.await {
                        log::warn!("stats task did not finish: {err}");
                    }
                }
            }
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let config = match &parsed.base_url {
        Some(url) => {
            let from_env = ApiConfig::from_env()?;
            let config = ApiConfig::new(url)?;
            match from_env.session_cookie() {
                Some(cookie) => config.with_session_cookie(cookie),
                None => config,
            }
        }
        None => ApiConfig::from_env()?,
    };
    log::info!("quiz server at {}", config.base_url());

    let api = Arc::new(HttpQuizApi::new(config.clone()));
    let mut service = QuizLoopService::new(Clock::default_clock(), config, api);
    if let Some(seed) = parsed.seed {
        service = service.with_seed(seed);
    }

    let session = match service.start(parsed.context).await {
        Ok(session) => session,
        Err(failure) => {
            println!("Ce quiz ne peut pas être lancé ({}).", failure.source);
            println!("-> {}", failure.redirect_to);
            return Err(failure.into());
        }
    };

    play(&service, session).await
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
