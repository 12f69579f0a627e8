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

//! Backend-agnostic rendering contracts.
//!
//! This module is the vocabulary shared by the scene data and the
//! draw-submission lanes: opaque GPU handles, resource descriptors, the
//! [`GraphicsDevice`] used at build time, and the [`CommandRecorder`] driven
//! once per frame. A concrete backend implements both traits.

pub mod api;
pub mod error;
pub mod light;
pub mod settings;
pub mod stats;
pub mod traits;

pub use self::api::*;
pub use self::error::{RenderError, ResourceError};
pub use self::light::{Light, LightCommon, LightKind, LightType, LIGHT_TYPE_NAMES};
pub use self::settings::RenderSettings;
pub use self::stats::RecordStats;
pub use self::traits::{CommandRecorder, GraphicsDevice};
