use std::{io::IsTerminal, process::ExitCode};

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use citadel_client::{
    ClientError,
    api::CitadelApi,
    boards::BOARDS,
    models::NewScroll,
    render::{IndentPolicy, Renderer},
    session::Session,
    shell::Shell,
    thread::build_thread,
    view::ThreadView,
};

use cli::{Cli, Command};

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{e:?}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn indent_policy(deep_indent: bool) -> IndentPolicy {
    if deep_indent {
        IndentPolicy::Proportional
    } else {
        IndentPolicy::default()
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let api = CitadelApi::new(&cli.host)?;
    let session_path = cli.session_file.map(Ok).unwrap_or_else(Session::default_path);
    let mut session = match session_path {
        Ok(path) => Session::load(path),
        Err(e) => {
            tracing::debug!("continuing without a session file: {e}");
            Session::detached()
        }
    };
    let color = !cli.no_color && std::io::stdout().is_terminal();

    let view = ThreadView::new();
    let renderer = Renderer::new(session.identity(), &view, Utc::now().naive_utc()).colored(color);

    match cli.command {
        Command::Boards => print!("{}", renderer.render_boards(&BOARDS)),
        Command::Posts { board } => {
            let posts = api.list_posts(board.as_deref()).await?;
            print!("{}", renderer.render_listing(&posts));
        }
        Command::Show { id, deep_indent } => {
            let detail = api.get_post(id, session.identity()).await?;
            let thread = build_thread(&detail.post.comments);
            print!(
                "{}",
                renderer
                    .policy(indent_policy(deep_indent))
                    .render_post(&detail, &thread)
            );
        }
        Command::Open { id, deep_indent } => {
            Shell::new(&api, session.identity(), id, indent_policy(deep_indent), color)
                .run()
                .await?;
        }
        Command::Post {
            title,
            content,
            board,
            link,
        } => {
            let post = api
                .create_post(&NewScroll {
                    title: &title,
                    content: &content,
                    username: session.identity(),
                    board: &board,
                    link: &link,
                })
                .await?;
            println!("Scroll #{} scribed on r/{} as {}", post.id, post.board, post.author.username);
        }
        Command::Rewrite { id, title, content } => {
            let post = api
                .update_post(id, &title, &content, session.identity())
                .await?;
            println!("Scroll #{} rewritten: {}", post.id, post.title);
        }
        Command::Burn { id } => {
            let reply = api.delete_post(id, session.identity()).await?;
            println!("{}", reply.message);
        }
        Command::Vote { id, direction } => {
            let outcome = api.vote(id, direction.into(), session.identity()).await?;
            let yours = match outcome.user_vote {
                1 => "up",
                -1 => "down",
                _ => "none",
            };
            println!("Scroll #{id} now stands at {:+} (your vote: {yours})", outcome.upvotes);
        }
        Command::Comment {
            post_id,
            content,
            parent,
        } => {
            let mark = api
                .create_comment(post_id, &content, session.identity(), parent)
                .await?;
            println!("Mark #{} left on scroll #{}", mark.id, mark.post_id);
        }
        Command::Amend { id, content } => {
            let mark = api.update_comment(id, &content, session.identity()).await?;
            println!("Mark #{} amended", mark.id);
        }
        Command::Erase { id } => {
            let reply = api.delete_comment(id, session.identity()).await?;
            println!("{}", reply.message);
        }
        Command::Register { username, password } => {
            let auth = api.register(&username, &password).await?;
            session.login(&auth.user.username)?;
            println!("{}. Welcome, {}", auth.message, auth.user.username);
        }
        Command::Login { username, password } => {
            let auth = api.login(&username, &password).await?;
            session.login(&auth.user.username)?;
            println!("{}. Welcome back, {}", auth.message, auth.user.username);
        }
        Command::Logout => {
            session.logout()?;
            println!("Logged out, you are {} again", session.identity());
        }
        Command::Whoami => match session.username() {
            Some(username) => println!("{username}"),
            None => println!("{} (not logged in)", session.identity()),
        },
        Command::Ping => {
            let reply = api.ping().await?;
            println!("{} from {}", reply.message, api.base_url());
        }
    }

    Ok(())
}
