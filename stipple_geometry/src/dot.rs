// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::Point;

/// A positioned item with a stable identity.
///
/// Both the hit grid and the collision resolver are generic over this trait so
/// that owners can hand in their own record type. Radii are supplied
/// separately as a function, since they usually depend on styling rather than
/// on the record itself.
pub trait Dot {
    /// Stable identity, unchanged across data updates.
    type Id: Clone + Eq + Hash + Debug;

    /// Returns the identity of this dot.
    fn id(&self) -> &Self::Id;

    /// Returns the center of this dot in data units.
    fn center(&self) -> Point;
}

impl<K> Dot for (K, Point)
where
    K: Clone + Eq + Hash + Debug,
{
    type Id = K;

    fn id(&self) -> &K {
        &self.0
    }

    fn center(&self) -> Point {
        self.1
    }
}
