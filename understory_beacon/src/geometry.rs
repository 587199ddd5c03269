// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marker placement.
//!
//! ## Overview
//!
//! [`compute_position`] maps a target's offset box, a marker size, an anchor [`Position`] and a
//! [`Boundary`] to the marker's top-left offset. The result lives in the same coordinate space as
//! the target box (its offset parent), which is where the marker node is appended.
//!
//! Each position decomposes into a horizontal and a vertical alignment:
//!
//! | alignment | inner | outer |
//! |---|---|---|
//! | start | `origin` | `origin - marker` |
//! | middle | `origin + (extent - marker) / 2` | same |
//! | end | `origin + extent - marker` | `origin + extent` |
//!
//! So `top-right` + `outer` places the marker at `(left + width, top - marker height)`, just
//! outside the target's corner. [`Position::Center`] is middle/middle and ignores the boundary.
//!
//! Marker sizes are whole pixels: fractional computed sizes truncate toward zero.
//!
//! [`in_fixed_context`] decides whether a target is anchored to a fixed-position ancestor. It only
//! selects a styling class; the coordinate math is the same either way.

use kurbo::{Point, Rect, Size};

use crate::host::ElementTree;
use crate::types::{Boundary, Position};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Align {
    Start,
    Middle,
    End,
}

impl Position {
    fn alignment(self) -> (Align, Align) {
        match self {
            Self::TopLeft => (Align::Start, Align::Start),
            Self::Top => (Align::Middle, Align::Start),
            Self::TopRight => (Align::End, Align::Start),
            Self::Left => (Align::Start, Align::Middle),
            Self::Center => (Align::Middle, Align::Middle),
            Self::Right => (Align::End, Align::Middle),
            Self::BottomLeft => (Align::Start, Align::End),
            Self::Bottom => (Align::Middle, Align::End),
            Self::BottomRight => (Align::End, Align::End),
        }
    }
}

fn place(align: Align, origin: f64, extent: f64, marker: f64, boundary: Boundary) -> f64 {
    match (align, boundary) {
        (Align::Start, Boundary::Inner) => origin,
        (Align::Start, Boundary::Outer) => origin - marker,
        (Align::Middle, _) => origin + (extent - marker) / 2.0,
        (Align::End, Boundary::Inner) => origin + extent - marker,
        (Align::End, Boundary::Outer) => origin + extent,
    }
}

/// Top-left offset of a marker of size `marker` anchored to `target`.
pub fn compute_position(target: Rect, marker: Size, position: Position, boundary: Boundary) -> Point {
    let marker = marker.trunc();
    let (h, v) = position.alignment();
    Point::new(
        place(h, target.x0, target.width(), marker.width, boundary),
        place(v, target.y0, target.height(), marker.height, boundary),
    )
}

/// Returns true if `el`, or an ancestor below the document root, is `position: fixed`.
///
/// Walks upward iteratively. The walk ends without a match at the first element that has no
/// parent or whose parent is the document root, so neither the root nor its direct child (the
/// body) is ever tested.
pub fn in_fixed_context<T: ElementTree + ?Sized>(tree: &T, el: T::Element) -> bool {
    let mut current = el;
    loop {
        let Some(parent) = tree.parent_of(current) else {
            return false;
        };
        if tree.is_document_root(parent) {
            return false;
        }
        if tree.is_fixed(current) {
            return true;
        }
        current = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    const TARGET: Rect = Rect::new(100.0, 50.0, 180.0, 70.0);
    const MARKER: Size = Size::new(10.0, 10.0);

    #[test]
    fn placement_table() {
        use Boundary::{Inner, Outer};
        use Position::*;
        let expected = [
            (TopLeft, Inner, (100.0, 50.0)),
            (TopLeft, Outer, (90.0, 40.0)),
            (Top, Inner, (135.0, 50.0)),
            (Top, Outer, (135.0, 40.0)),
            (TopRight, Inner, (170.0, 50.0)),
            (TopRight, Outer, (180.0, 40.0)),
            (Left, Inner, (100.0, 55.0)),
            (Left, Outer, (90.0, 55.0)),
            (Center, Inner, (135.0, 55.0)),
            (Center, Outer, (135.0, 55.0)),
            (Right, Inner, (170.0, 55.0)),
            (Right, Outer, (180.0, 55.0)),
            (BottomLeft, Inner, (100.0, 60.0)),
            (BottomLeft, Outer, (90.0, 70.0)),
            (Bottom, Inner, (135.0, 60.0)),
            (Bottom, Outer, (135.0, 70.0)),
            (BottomRight, Inner, (170.0, 60.0)),
            (BottomRight, Outer, (180.0, 70.0)),
        ];
        for (position, boundary, (x, y)) in expected {
            assert_eq!(
                compute_position(TARGET, MARKER, position, boundary),
                Point::new(x, y),
                "{position}/{boundary}"
            );
        }
    }

    #[test]
    fn marker_size_truncates() {
        let p = compute_position(
            TARGET,
            Size::new(10.9, 10.2),
            Position::TopRight,
            Boundary::Outer,
        );
        assert_eq!(p, Point::new(180.0, 40.0));
    }

    #[test]
    fn middle_keeps_half_pixels() {
        let target = Rect::new(0.0, 0.0, 81.0, 21.0);
        let p = compute_position(target, MARKER, Position::Center, Boundary::Inner);
        assert_eq!(p, Point::new(35.5, 5.5));
    }

    #[test]
    fn unknown_names_place_at_center() {
        let p = compute_position(TARGET, MARKER, Position::parse("nowhere"), Boundary::Outer);
        assert_eq!(p, Point::new(135.0, 55.0));
    }

    /// Elements are indices; `parents[i]` is the parent of `i`. Element 0 is the root.
    struct Chain {
        parents: Vec<Option<usize>>,
        fixed: Vec<bool>,
    }

    impl ElementTree for Chain {
        type Element = usize;

        fn parent_of(&self, el: usize) -> Option<usize> {
            self.parents[el]
        }

        fn is_document_root(&self, el: usize) -> bool {
            el == 0
        }

        fn is_fixed(&self, el: usize) -> bool {
            self.fixed[el]
        }
    }

    // root(0) → body(1) → a(2) → b(3), plus detached d(4).
    fn chain(fixed: [bool; 5]) -> Chain {
        Chain {
            parents: vec![None, Some(0), Some(1), Some(2), None],
            fixed: fixed.to_vec(),
        }
    }

    #[test]
    fn fixed_ancestor_is_found() {
        let tree = chain([false, false, true, false, false]);
        assert!(in_fixed_context(&tree, 3), "ancestor a is fixed");
        assert!(in_fixed_context(&tree, 2), "a itself is fixed");
    }

    #[test]
    fn fixed_target_is_found() {
        let tree = chain([false, false, false, true, false]);
        assert!(in_fixed_context(&tree, 3));
        assert!(!in_fixed_context(&tree, 2));
    }

    #[test]
    fn root_body_and_detached_are_never_tested() {
        let tree = chain([true, true, false, false, true]);
        assert!(!in_fixed_context(&tree, 3), "body and root are not consulted");
        assert!(!in_fixed_context(&tree, 1));
        assert!(!in_fixed_context(&tree, 0));
        assert!(!in_fixed_context(&tree, 4), "detached element has no parent");
    }
}
