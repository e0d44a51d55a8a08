//! Interactive view of one scroll. Reads commands from stdin, one per line,
//! and redraws the thread after every change.

use std::io::Write as _;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    ClientError,
    api::CitadelApi,
    models::{Comment, PostDetail, VoteDirection},
    render::{IndentPolicy, Renderer},
    thread::{CommentNode, build_thread},
    view::ThreadView,
};

const HELP: &str = "\
commands:
  reply <id>            open or close a reply to mark <id>
  amend <id>            start amending your mark <id>
  write [reply|amend] <text>
                        set the text of the open draft
  save [reply|amend]    submit the open draft
  cancel [reply|amend]  drop a draft, or both
  mark <text>           leave a new top-level mark
  delete <id>           erase your mark <id>
  up | down             vote on the scroll
  refresh               fetch the scroll again
  quit";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Reply,
    Amend,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Reply(i32),
    Amend(i32),
    Write(Option<Slot>, String),
    Save(Option<Slot>),
    Cancel(Option<Slot>),
    Mark(String),
    Delete(i32),
    Vote(VoteDirection),
    Refresh,
    Help,
    Quit,
}

fn parse_id(arg: &str) -> Result<i32, String> {
    arg.trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| format!("`{arg}` is not a mark id"))
}

fn parse_slot(arg: &str) -> Option<Slot> {
    match arg {
        "reply" => Some(Slot::Reply),
        "amend" => Some(Slot::Amend),
        _ => None,
    }
}

fn optional_slot(rest: &str) -> Result<Option<Slot>, String> {
    if rest.is_empty() {
        return Ok(None);
    }
    parse_slot(rest)
        .map(Some)
        .ok_or_else(|| format!("expected `reply` or `amend`, got `{rest}`"))
}

pub fn parse(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match word {
        "reply" => parse_id(rest).map(ShellCommand::Reply),
        "amend" => parse_id(rest).map(ShellCommand::Amend),
        "delete" => parse_id(rest).map(ShellCommand::Delete),
        "write" => {
            let (first, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            match parse_slot(first) {
                Some(slot) => Ok(ShellCommand::Write(Some(slot), text.trim().to_string())),
                None => Ok(ShellCommand::Write(None, rest.to_string())),
            }
        }
        "save" => optional_slot(rest).map(ShellCommand::Save),
        "cancel" => optional_slot(rest).map(ShellCommand::Cancel),
        "mark" if !rest.is_empty() => Ok(ShellCommand::Mark(rest.to_string())),
        "mark" => Err("a mark needs some text".into()),
        "up" => Ok(ShellCommand::Vote(VoteDirection::Up)),
        "down" => Ok(ShellCommand::Vote(VoteDirection::Down)),
        "refresh" | "" => Ok(ShellCommand::Refresh),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command `{other}`, try `help`")),
    }
}

/// What the loop does after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<'a> {
    api: &'a CitadelApi,
    identity: &'a str,
    post_id: i32,
    policy: IndentPolicy,
    color: bool,
    view: ThreadView,
    detail: Option<PostDetail>,
    thread: Vec<CommentNode>,
}

impl<'a> Shell<'a> {
    pub fn new(
        api: &'a CitadelApi,
        identity: &'a str,
        post_id: i32,
        policy: IndentPolicy,
        color: bool,
    ) -> Self {
        Shell {
            api,
            identity,
            post_id,
            policy,
            color,
            view: ThreadView::new(),
            detail: None,
            thread: Vec::new(),
        }
    }

    /// Runs until `quit` or the end of input. Only the first fetch is fatal;
    /// later failures are printed and the drafts stay as they were.
    pub async fn run(mut self) -> Result<(), ClientError> {
        self.refresh().await?;
        self.draw();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("{}> ", self.identity);
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!();
                break;
            };

            let command = match parse(&line) {
                Ok(command) => command,
                Err(msg) => {
                    eprintln!("{msg}");
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    tracing::debug!("command failed: {e:?}");
                    eprintln!("error: {e}");
                }
            }
        }

        Ok(())
    }

    /// Fetches the scroll again, rebuilds the thread and closes any slot
    /// whose target disappeared.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let detail = self.api.get_post(self.post_id, self.identity).await?;
        self.thread = build_thread(&detail.post.comments);
        self.view.forget_missing(&self.thread);
        self.detail = Some(detail);
        Ok(())
    }

    pub fn view(&self) -> &ThreadView {
        &self.view
    }

    fn draw(&self) {
        if let Some(detail) = &self.detail {
            let renderer = Renderer::new(self.identity, &self.view, Utc::now().naive_utc())
                .policy(self.policy)
                .colored(self.color);
            print!("{}", renderer.render_post(detail, &self.thread));
        }
    }

    fn find_mark(&self, id: i32) -> Option<&Comment> {
        self.detail
            .as_ref()
            .and_then(|d| d.post.comments.iter().find(|c| c.id == id))
    }

    fn own_mark(&self, id: i32) -> Result<&Comment, String> {
        let mark = self
            .find_mark(id)
            .ok_or_else(|| format!("no mark #{id} on this scroll"))?;

        if mark.author.username != self.identity {
            return Err(format!("mark #{id} is not yours"));
        }

        Ok(mark)
    }

    fn slot_for(&self, slot: Option<Slot>) -> Option<Slot> {
        slot.or_else(|| {
            if self.view.reply().is_some() {
                Some(Slot::Reply)
            } else if self.view.amend().is_some() {
                Some(Slot::Amend)
            } else {
                None
            }
        })
    }

    /// Applies one command. A failed request leaves the drafts untouched.
    pub async fn execute(&mut self, command: ShellCommand) -> Result<Flow, ClientError> {
        match command {
            ShellCommand::Reply(id) => {
                if self.find_mark(id).is_none() {
                    eprintln!("no mark #{id} on this scroll");
                    return Ok(Flow::Continue);
                }
                self.view.toggle_reply(id);
            }
            ShellCommand::Amend(id) => {
                let content = match self.own_mark(id) {
                    Ok(mark) => mark.content.clone(),
                    Err(msg) => {
                        eprintln!("{msg}");
                        return Ok(Flow::Continue);
                    }
                };
                self.view.start_amend(id, &content);
            }
            ShellCommand::Write(slot, text) => {
                let written = match self.slot_for(slot) {
                    Some(Slot::Reply) => self.view.write_reply(&text),
                    Some(Slot::Amend) => self.view.write_amend(&text),
                    None => false,
                };
                if !written {
                    eprintln!("nothing to write into, start with `reply <id>` or `amend <id>`");
                    return Ok(Flow::Continue);
                }
            }
            ShellCommand::Save(slot) => match self.slot_for(slot) {
                Some(Slot::Reply) => self.save_reply().await?,
                Some(Slot::Amend) => self.save_amend().await?,
                None => {
                    eprintln!("no open draft");
                    return Ok(Flow::Continue);
                }
            },
            ShellCommand::Cancel(slot) => match slot {
                Some(Slot::Reply) => self.view.cancel_reply(),
                Some(Slot::Amend) => self.view.cancel_amend(),
                None => {
                    self.view.cancel_reply();
                    self.view.cancel_amend();
                }
            },
            ShellCommand::Mark(text) => {
                self.api
                    .create_comment(self.post_id, &text, self.identity, None)
                    .await?;
                self.refresh().await?;
            }
            ShellCommand::Delete(id) => {
                if let Err(msg) = self.own_mark(id) {
                    eprintln!("{msg}");
                    return Ok(Flow::Continue);
                }
                self.api.delete_comment(id, self.identity).await?;
                self.refresh().await?;
            }
            ShellCommand::Vote(direction) => {
                self.api.vote(self.post_id, direction, self.identity).await?;
                self.refresh().await?;
            }
            ShellCommand::Refresh => self.refresh().await?,
            ShellCommand::Help => {
                println!("{HELP}");
                return Ok(Flow::Continue);
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        self.draw();
        Ok(Flow::Continue)
    }

    async fn save_reply(&mut self) -> Result<(), ClientError> {
        let Some(draft) = self.view.reply().cloned() else {
            return Ok(());
        };

        if draft.text.trim().is_empty() {
            eprintln!("the reply is empty, `write` something first");
            return Ok(());
        }

        self.api
            .create_comment(self.post_id, &draft.text, self.identity, Some(draft.target))
            .await?;
        self.view.reply_submitted();
        self.refresh().await
    }

    async fn save_amend(&mut self) -> Result<(), ClientError> {
        let Some(draft) = self.view.amend().cloned() else {
            return Ok(());
        };

        self.api
            .update_comment(draft.target, &draft.text, self.identity)
            .await?;
        self.view.amend_submitted();
        self.refresh().await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_targets() {
        assert_eq!(parse("reply 4"), Ok(ShellCommand::Reply(4)));
        assert_eq!(parse("amend #12"), Ok(ShellCommand::Amend(12)));
        assert_eq!(parse("delete 3"), Ok(ShellCommand::Delete(3)));
        assert!(parse("reply four").is_err());
    }

    #[test]
    fn test_parse_write() {
        assert_eq!(
            parse("write The night is dark"),
            Ok(ShellCommand::Write(None, "The night is dark".into()))
        );
        assert_eq!(
            parse("write amend  fixed typo"),
            Ok(ShellCommand::Write(Some(Slot::Amend), "fixed typo".into()))
        );
    }

    #[test]
    fn test_parse_slots() {
        assert_eq!(parse("save"), Ok(ShellCommand::Save(None)));
        assert_eq!(parse("cancel reply"), Ok(ShellCommand::Cancel(Some(Slot::Reply))));
        assert!(parse("cancel everything").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse("  up "), Ok(ShellCommand::Vote(VoteDirection::Up)));
        assert_eq!(parse(""), Ok(ShellCommand::Refresh));
        assert_eq!(parse("q"), Ok(ShellCommand::Quit));
        assert!(parse("mark").is_err());
        assert!(parse("dance").is_err());
    }
}
