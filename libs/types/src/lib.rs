//! Types library for the splitter ledger
//!
//! Value types shared by the contract layer and its hosts.
//!
//! # Modules
//! - `ids`: Account identities (`Address`)
//! - `numeric`: Integer wei amounts (`Amount`) and ether conversion
//! - `errors`: Error taxonomy

pub mod errors;
pub mod ids;
pub mod numeric;

