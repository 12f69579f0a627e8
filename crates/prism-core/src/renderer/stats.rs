// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-frame counters reported by the render graph.

use std::ops::AddAssign;

/// Counts of the state changes and draws issued by one `record` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordStats {
    /// Material shader pipeline binds, one per shader node drawn.
    pub pipeline_binds: u32,
    /// Pipeline binds issued by auxiliary nodes such as the background.
    pub auxiliary_pipeline_binds: u32,
    /// Material descriptor-set binds.
    pub material_binds: u32,
    /// Per-object descriptor-set binds.
    pub object_binds: u32,
    /// Vertex/index buffer pair binds.
    pub buffer_binds: u32,
    /// Draw calls, indexed or not.
    pub draw_calls: u32,
    /// Indices submitted by indexed draws.
    pub indices_drawn: u64,
    /// Submeshes skipped because their index range was empty.
    pub skipped_empty: u32,
    /// Auxiliary nodes skipped because they were disabled.
    pub skipped_auxiliary: u32,
}

impl RecordStats {
    /// The number of triangles submitted, assuming a triangle list.
    pub fn triangles(&self) -> u64 {
        self.indices_drawn / 3
    }
}

impl AddAssign for RecordStats {
    fn add_assign(&mut self, rhs: Self) {
        self.pipeline_binds += rhs.pipeline_binds;
        self.auxiliary_pipeline_binds += rhs.auxiliary_pipeline_binds;
        self.material_binds += rhs.material_binds;
        self.object_binds += rhs.object_binds;
        self.buffer_binds += rhs.buffer_binds;
        self.draw_calls += rhs.draw_calls;
        self.indices_drawn += rhs.indices_drawn;
        self.skipped_empty += rhs.skipped_empty;
        self.skipped_auxiliary += rhs.skipped_auxiliary;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate() {
        let mut total = RecordStats::default();
        let frame = RecordStats {
            draw_calls: 2,
            indices_drawn: 9,
            ..Default::default()
        };
        total += frame;
        total += frame;
        assert_eq!(total.draw_calls, 4);
        assert_eq!(total.triangles(), 6);
    }

    #[test]
    fn auxiliary_binds_are_counted_apart() {
        let mut total = RecordStats {
            pipeline_binds: 2,
            ..Default::default()
        };
        total += RecordStats {
            auxiliary_pipeline_binds: 1,
            ..Default::default()
        };
        assert_eq!(total.pipeline_binds, 2);
        assert_eq!(total.auxiliary_pipeline_binds, 1);
    }
}
