// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

/// Default nesting limit for encoding and decoding.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

/// Configuration shared by the [`crate::hessian::Hessian`] facade and the
/// encoders and decoders it creates.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum nesting of lists, maps and objects, on both sides.
    pub max_depth: u32,
    /// Whether the encoder writes repeated composites as back-references.
    /// Without it every occurrence is written in full and a cyclic graph
    /// fails once the nesting limit is reached.
    pub track_ref: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: DEFAULT_MAX_DEPTH,
            track_ref: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline(always)]
    pub fn is_track_ref(&self) -> bool {
        self.track_ref
    }
}
