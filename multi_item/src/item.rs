// Copyright 2025 the Multi Item Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Source item snapshots.

use alloc::vec::Vec;

use crate::types::NodeKind;

/// Source data for one multi-item question, structured per a [`Shape`](crate::Shape).
///
/// Items are immutable snapshots. The surrounding system builds a new item whenever the
/// underlying data changes, which is why consumers hold them behind `Rc` and compare by
/// identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Item<C, H, T> {
    /// Content leaf payload.
    Content(C),
    /// Hint leaf payload.
    Hint(H),
    /// Tags leaf payload.
    Tags(T),
    /// Ordered sequence of sub-items.
    List(Vec<Self>),
}

impl<C, H, T> Item<C, H, T> {
    /// Kind of node at this position.
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Content(_) => NodeKind::Content,
            Self::Hint(_) => NodeKind::Hint,
            Self::Tags(_) => NodeKind::Tags,
            Self::List(_) => NodeKind::Array,
        }
    }
}
