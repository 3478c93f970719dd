// Console client core: application-state broadcast, title synchronization,
// session storage and the schedule submission flow. The REST backend, the
// routing framework and the embedded sub-tools are external collaborators.

pub mod client;
pub mod form;
pub mod routes;
pub mod session;
pub mod state;
pub mod title;
