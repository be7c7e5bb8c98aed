//! # Architecture Abstraction Layer
//!
//! Hardware tick sources. Currently implements the Cortex-M SysTick port;
//! extensible to other timers by adding sibling modules.

pub mod cortex_m4;
