//! Plansheet Core Types
//!
//! This crate provides the foundational types shared by the plansheet
//! validation and normalization pipeline. It includes:
//!
//! - **Geometry**: Transform, alignment and polygon parameters ([`geometry`] module)
//! - **Keys**: The layer key codec ([`key::LayerKey`], [`key::LayerLocator`])
//! - **Layers**: The closed layer node model ([`layer::LayerNode`])

pub mod geometry;
pub mod key;
pub mod layer;
