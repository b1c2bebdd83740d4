use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use nightowl_core::{ActionPlan, Identity, InteractionOutcome, Target, UnfollowOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::driver::protocol::{DriverCommand, DriverReply};
use crate::driver::{
    Device, DriverError, Flow, Interactor, ProfileFilter, SourceWalker, TargetVisitor,
    Unfollower, WalkRequest,
};
use crate::error::JobError;

#[derive(Debug, Clone)]
pub struct ProcessDriverConfig {
    pub command: String,
    pub args: Vec<String>,
    /// How long to wait for a single reply line.
    pub reply_timeout: Duration,
}

impl ProcessDriverConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            reply_timeout: Duration::from_secs(120),
        }
    }
}

struct DriverIo {
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

/// Speaks JSON Lines to a helper process that does the actual UI automation.
///
/// Each request/reply exchange holds the I/O lock for its own duration only,
/// so a walk can hand targets to a visitor that issues further commands.
pub struct ProcessDriver {
    io: Mutex<DriverIo>,
    reply_timeout: Duration,
    // Held so the helper is killed when the driver is dropped.
    _child: Mutex<Child>,
}

impl ProcessDriver {
    pub fn spawn(config: &ProcessDriverConfig) -> Result<Self, DriverError> {
        info!(command = %config.command, args = ?config.args, "spawning driver process");
        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DriverError::app(format!("failed to spawn `{}`: {e}", config.command)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DriverError::protocol("driver stdin is not piped"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DriverError::protocol("driver stdout is not piped"))?;

        Ok(Self {
            io: Mutex::new(DriverIo {
                stdin,
                stdout: BufReader::new(stdout).lines(),
            }),
            reply_timeout: config.reply_timeout,
            _child: Mutex::new(child),
        })
    }

    async fn exchange(&self, command: &DriverCommand) -> Result<DriverReply, DriverError> {
        let mut line = serde_json::to_string(command)
            .map_err(|e| DriverError::protocol(format!("cannot encode {}: {e}", command.name())))?;
        line.push('\n');

        let mut io = self.io.lock().await;
        io.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| DriverError::protocol(format!("write {}: {e}", command.name())))?;
        io.stdin
            .flush()
            .await
            .map_err(|e| DriverError::protocol(format!("flush {}: {e}", command.name())))?;

        let next = tokio::time::timeout(self.reply_timeout, io.stdout.next_line())
            .await
            .map_err(|_| {
                DriverError::timeout(format!(
                    "no reply to {} within {}s",
                    command.name(),
                    self.reply_timeout.as_secs()
                ))
            })?
            .map_err(|e| DriverError::protocol(format!("read reply to {}: {e}", command.name())))?;
        drop(io);

        let Some(raw) = next else {
            return Err(DriverError::protocol("driver closed its stdout"));
        };
        debug!(command = command.name(), reply = %raw, "driver reply");

        match serde_json::from_str::<DriverReply>(&raw) {
            Ok(DriverReply::Error { kind, message }) => Err(DriverError::new(kind, message)),
            Ok(reply) => Ok(reply),
            Err(e) => Err(DriverError::protocol(format!(
                "unparsable reply to {}: {e}",
                command.name()
            ))),
        }
    }

    async fn expect_ok(&self, command: DriverCommand) -> Result<(), DriverError> {
        match self.exchange(&command).await? {
            DriverReply::Ok => Ok(()),
            other => Err(unexpected(&command, &other)),
        }
    }
}

fn unexpected(command: &DriverCommand, reply: &DriverReply) -> DriverError {
    DriverError::protocol(format!("unexpected reply to {}: {reply:?}", command.name()))
}

#[async_trait]
impl Device for ProcessDriver {
    async fn open_app(&self) -> Result<(), DriverError> {
        self.expect_ok(DriverCommand::OpenApp).await
    }

    async fn close_app(&self) -> Result<(), DriverError> {
        self.expect_ok(DriverCommand::CloseApp).await
    }

    async fn current_username(&self) -> Result<Identity, DriverError> {
        let command = DriverCommand::CurrentUsername;
        match self.exchange(&command).await? {
            DriverReply::Username { username } => Ok(Identity::new(username)),
            other => Err(unexpected(&command, &other)),
        }
    }

    async fn capture_snapshot(&self, label: &str) -> Result<(), DriverError> {
        self.expect_ok(DriverCommand::Snapshot {
            label: label.to_string(),
        })
        .await
    }
}

#[async_trait]
impl Interactor for ProcessDriver {
    async fn interact(
        &self,
        target: &Target,
        plan: &ActionPlan,
    ) -> Result<InteractionOutcome, DriverError> {
        let command = DriverCommand::Interact {
            target: target.clone(),
            plan: plan.clone(),
        };
        match self.exchange(&command).await? {
            DriverReply::Outcome { outcome } => Ok(outcome),
            other => Err(unexpected(&command, &other)),
        }
    }
}

#[async_trait]
impl SourceWalker for ProcessDriver {
    async fn walk(
        &self,
        request: &WalkRequest,
        visitor: &mut dyn TargetVisitor,
    ) -> Result<(), JobError> {
        self.expect_ok(DriverCommand::Walk {
            source: request.source.clone(),
            is_self: request.is_self,
            interact_percentage: request.interact_percentage.value(),
        })
        .await?;

        loop {
            let command = DriverCommand::Next;
            let username = match self.exchange(&command).await? {
                DriverReply::Target { username } => username,
                DriverReply::Done => return Ok(()),
                other => return Err(unexpected(&command, &other).into()),
            };

            match visitor.visit(Target::new(username, request.source.clone())).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => {
                    self.expect_ok(DriverCommand::Stop).await?;
                    return Ok(());
                }
                Err(e) => {
                    if let Err(stop) = self.expect_ok(DriverCommand::Stop).await {
                        warn!(error = %stop, "failed to stop walk after visitor error");
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl Unfollower for ProcessDriver {
    async fn unfollow(&self, username: &str) -> Result<UnfollowOutcome, DriverError> {
        let command = DriverCommand::Unfollow {
            username: username.to_string(),
        };
        match self.exchange(&command).await? {
            DriverReply::Unfollowed { outcome } => Ok(outcome),
            other => Err(unexpected(&command, &other)),
        }
    }
}

#[async_trait]
impl ProfileFilter for ProcessDriver {
    async fn should_interact(&self, target: &Target) -> Result<bool, DriverError> {
        let command = DriverCommand::Filter {
            target: target.clone(),
        };
        match self.exchange(&command).await? {
            DriverReply::Verdict { interact } => Ok(interact),
            other => Err(unexpected(&command, &other)),
        }
    }
}
