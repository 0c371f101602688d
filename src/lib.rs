// Library root
// -----------
// The binary (`main.rs`) wires these modules together; keeping them in a
// library lets the sequencing be tested without a live service.
//
// Module responsibilities:
// - `api`: request payloads, the `NutritionApi` trait and the blocking
//   HTTP client that implements it.
// - `seeder`: runs food item -> meal -> daily log, stopping when a
//   response has no `_id`.
// - `config`: resolves the server base URL.
// - `cli`: command-line arguments and the usage line.
// - `ui`: spinner feedback around API calls.
pub mod api;
pub mod cli;
pub mod config;
pub mod seeder;
pub mod ui;
