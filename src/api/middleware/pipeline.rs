//! Pipeline composition.
//!
//! A route's protection is declared as a slice of [`Stage`] values, listed
//! in execution order. [`compose`] folds the slice onto a method router from
//! the innermost layer outward, so the first stage in the slice is the first
//! to see the request and the first able to short-circuit it.

use axum::extract::{Path, Request, State};
use axum::middleware::{Next, from_fn, from_fn_with_state};
use axum::routing::MethodRouter;
use uuid::Uuid;

use crate::domain::Clearance;
use crate::infrastructure::AppDependencies;

use super::gates::{self, OwnershipKind};
use super::stages;

/// One step of a route's request pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Logs method, origin and declared body size, then always passes.
    Logger,
    /// Rejects requests whose declared body exceeds the byte limit (413).
    UploadLimit(u64),
    /// Validates the bearer token and attaches the caller's identity (401).
    Auth,
    /// Requires the caller's clearance to meet the given floor (403).
    Clearance(Clearance),
    /// Requires the caller to own the path resource (403).
    Ownership(OwnershipKind),
    /// Passes on sufficient clearance, falling back to ownership (403).
    ///
    /// Clearance is checked first; the ownership lookup only runs when the
    /// clearance check fails.
    ClearanceOrOwnership(Clearance, OwnershipKind),
}

/// Wraps `endpoint` in the given stages, first stage outermost.
pub fn compose(
    stages: &[Stage],
    endpoint: MethodRouter<AppDependencies>,
    dependencies: &AppDependencies,
) -> MethodRouter<AppDependencies> {
    let mut wrapped = endpoint;
    for stage in stages.iter().rev() {
        wrapped = apply(*stage, wrapped, dependencies.clone());
    }
    wrapped
}

fn apply(
    stage: Stage,
    endpoint: MethodRouter<AppDependencies>,
    dependencies: AppDependencies,
) -> MethodRouter<AppDependencies> {
    match stage {
        Stage::Logger => endpoint.layer(from_fn(stages::log_request)),
        Stage::UploadLimit(limit) => endpoint.layer(from_fn(
            move |request: Request, next: Next| async move {
                stages::enforce_upload_limit(limit, request, next).await
            },
        )),
        Stage::Auth => endpoint.layer(from_fn_with_state(dependencies, stages::authenticate)),
        Stage::Clearance(floor) => endpoint.layer(from_fn_with_state(
            dependencies,
            move |state: State<AppDependencies>, request: Request, next: Next| async move {
                gates::require_clearance(state, floor, request, next).await
            },
        )),
        Stage::Ownership(kind) => endpoint.layer(from_fn_with_state(
            dependencies,
            move |state: State<AppDependencies>,
                  path: Path<Uuid>,
                  request: Request,
                  next: Next| async move {
                gates::require_ownership(state, kind, path, request, next).await
            },
        )),
        Stage::ClearanceOrOwnership(floor, kind) => endpoint.layer(from_fn_with_state(
            dependencies,
            move |state: State<AppDependencies>,
                  path: Path<Uuid>,
                  request: Request,
                  next: Next| async move {
                gates::require_clearance_or_ownership(state, floor, kind, path, request, next)
                    .await
            },
        )),
    }
}
