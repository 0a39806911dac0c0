// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::handle::HandleId;
use crate::stack::StackError;
use crate::style::StyleError;

/// Errors returned by
/// [`ControlStateCoordinator`](crate::coordinator::ControlStateCoordinator)
/// operations.
///
/// Map runtime failures (load errors, stalls, failed style fetches) are not
/// errors; they surface as badges, notices and modal states.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The catalog snapshot could not be built.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A stack reorder was rejected.
    #[error(transparent)]
    Stack(#[from] StackError),
    /// A style operation was rejected.
    #[error(transparent)]
    Style(#[from] StyleError),
    /// The handle no longer refers to a live layer.
    #[error("{0:?} refers to a removed layer")]
    StaleHandle(HandleId),
    /// No visible basemap exists to apply a basemap slider to.
    #[error("no visible basemap")]
    NoBasemap,
}
