//! Collaborator traits for the UI-automation side of a run.
//!
//! The controller never talks to a device directly. Everything it needs is
//! reached through these traits, implemented by [`ProcessDriver`] for real
//! runs and by hand-written mocks in tests.

mod error;
mod process;
pub mod protocol;

use std::sync::Arc;

use async_trait::async_trait;
use nightowl_core::{
    ActionPlan, Identity, InteractionOutcome, Percentage, Source, Target, UnfollowOutcome,
};

use crate::error::JobError;

pub use error::{DriverError, DriverErrorKind};
pub use process::{ProcessDriver, ProcessDriverConfig};

#[async_trait]
pub trait Device: Send + Sync {
    async fn open_app(&self) -> Result<(), DriverError>;

    async fn close_app(&self) -> Result<(), DriverError>;

    async fn current_username(&self) -> Result<Identity, DriverError>;

    /// Save a screenshot and view dump under `label`. Callers treat this as
    /// best effort and only log failures.
    async fn capture_snapshot(&self, label: &str) -> Result<(), DriverError>;
}

#[async_trait]
pub trait Interactor: Send + Sync {
    /// Perform the planned actions on an already opened profile.
    async fn interact(
        &self,
        target: &Target,
        plan: &ActionPlan,
    ) -> Result<InteractionOutcome, DriverError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Receives each candidate a [`SourceWalker`] discovers.
#[async_trait]
pub trait TargetVisitor: Send {
    async fn visit(&mut self, target: Target) -> Result<Flow, JobError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkRequest {
    pub source: Source,
    /// The source is the logged-in account's own follower list.
    pub is_self: bool,
    /// Share of the source the walker should go through before finishing.
    pub interact_percentage: Percentage,
}

#[async_trait]
pub trait SourceWalker: Send + Sync {
    /// Walk the source, handing every candidate to `visitor` until the
    /// source is exhausted or the visitor returns [`Flow::Stop`]. Visitor
    /// errors are returned unchanged.
    async fn walk(
        &self,
        request: &WalkRequest,
        visitor: &mut dyn TargetVisitor,
    ) -> Result<(), JobError>;
}

#[async_trait]
pub trait Unfollower: Send + Sync {
    async fn unfollow(&self, username: &str) -> Result<UnfollowOutcome, DriverError>;
}

#[async_trait]
pub trait ProfileFilter: Send + Sync {
    async fn should_interact(&self, target: &Target) -> Result<bool, DriverError>;
}

/// Filter that lets every profile through.
pub struct AcceptAll;

#[async_trait]
impl ProfileFilter for AcceptAll {
    async fn should_interact(&self, _target: &Target) -> Result<bool, DriverError> {
        Ok(true)
    }
}

#[derive(Clone)]
pub struct Collaborators {
    pub device: Arc<dyn Device>,
    pub interactor: Arc<dyn Interactor>,
    pub walker: Arc<dyn SourceWalker>,
    pub unfollower: Arc<dyn Unfollower>,
    pub filter: Arc<dyn ProfileFilter>,
}

impl Collaborators {
    /// Use one implementation for every role.
    pub fn from_driver<D>(driver: Arc<D>) -> Self
    where
        D: Device + Interactor + SourceWalker + Unfollower + ProfileFilter + 'static,
    {
        Self {
            device: driver.clone(),
            interactor: driver.clone(),
            walker: driver.clone(),
            unfollower: driver.clone(),
            filter: driver,
        }
    }
}
