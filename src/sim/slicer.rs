//! Pointer-trail tracking and trail-vs-target collision
//!
//! The slicer keeps a short, decaying history of pointer samples and tests
//! every consecutive segment of that trail against live targets. Testing the
//! full trail (not just the newest segment) is what catches fast strokes that
//! would otherwise tunnel through a target between frames.

use std::collections::VecDeque;

use glam::Vec2;

use super::target::Target;
use crate::consts::*;

/// One pointer sample, stamped with the slicer's own clock
#[derive(Debug, Clone, Copy)]
pub struct SlicePoint {
    pub pos: Vec2,
    pub time: f32,
}

/// A target cut during a collision query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceHit {
    pub id: u32,
    pub pos: Vec2,
}

/// Tracked recent history of pointer positions
#[derive(Debug, Clone, Default)]
pub struct Slicer {
    points: VecDeque<SlicePoint>,
    slicing: bool,
    clock: f32,
}

impl Slicer {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TRAIL_MAX_POINTS),
            slicing: false,
            clock: 0.0,
        }
    }

    /// Pointer down: establish a new trail
    pub fn begin(&mut self, pos: Vec2) {
        self.slicing = true;
        self.push(pos);
    }

    /// Pointer move: append a sample while a trail is active
    pub fn extend(&mut self, pos: Vec2) {
        if !self.slicing {
            return;
        }
        self.push(pos);
    }

    /// Pointer up: terminate the trail; samples are ignored until `begin`
    pub fn finish(&mut self) {
        self.slicing = false;
    }

    fn push(&mut self, pos: Vec2) {
        if self.points.len() >= TRAIL_MAX_POINTS {
            self.points.pop_front();
        }
        self.points.push_back(SlicePoint {
            pos,
            time: self.clock,
        });
    }

    /// Advance the slicer clock and prune aged samples. Positions never
    /// change here; pointer handlers are the only writers.
    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
        // Timestamps are monotonic, so pruning from the front suffices
        while let Some(front) = self.points.front() {
            if self.clock - front.time >= TRAIL_LIFETIME {
                self.points.pop_front();
            } else {
                break;
            }
        }
    }

    /// Test the trail against all live, unsliced targets. Each hit target is
    /// marked sliced and reported exactly once (first segment hit wins).
    pub fn check_collisions(&self, targets: &mut [Target]) -> Vec<SliceHit> {
        let mut hits = Vec::new();
        if self.points.len() < 2 {
            return hits;
        }

        for target in targets.iter_mut() {
            if !target.active || target.sliced {
                continue;
            }
            for (a, b) in self.points.iter().zip(self.points.iter().skip(1)) {
                if segment_hits_circle(a.pos, b.pos, target.pos, target.radius) {
                    target.slice();
                    hits.push(SliceHit {
                        id: target.id,
                        pos: target.pos,
                    });
                    break;
                }
            }
        }
        hits
    }

    /// Trail segments with a fade factor for rendering: (from, to, alpha)
    pub fn trail(&self) -> impl Iterator<Item = (Vec2, Vec2, f32)> + '_ {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .map(|(a, b)| {
                let age = self.clock - b.time;
                let alpha = (1.0 - age / TRAIL_LIFETIME).max(0.0);
                (a.pos, b.pos, alpha)
            })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_slicing(&self) -> bool {
        self.slicing
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.slicing = false;
    }
}

/// Closest-point test between a line segment and a circle: project the
/// center onto the segment, clamp to the segment, compare distance to the
/// radius. Degenerate segments never hit.
pub fn segment_hits_circle(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq < 0.0001 {
        return false;
    }
    let t = ((center - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    let closest = a + seg * t;
    closest.distance_squared(center) <= radius * radius
}
