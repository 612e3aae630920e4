//! Library side of the `lims-import` binary: logging setup and the
//! command session over reference data and the record store.

pub mod logging;
pub mod session;
