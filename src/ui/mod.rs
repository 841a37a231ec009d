// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the point annotator.

pub mod canvas;
pub mod navigation;
pub mod properties;
pub mod toolbar;
