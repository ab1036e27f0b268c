/// Data reshaping for the climate service.
///
/// Submodules:
/// - `groupings` — turns query rows into the shapes rendered as JSON.

pub mod groupings;
