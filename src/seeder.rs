// Sequencing of the three seeding calls. Each step only runs when the
// previous response carried an `_id`; otherwise the run stops and
// whatever was already created stays on the server.

use crate::api::{response_id, DailyLogRequest, FoodItemDetails, FoodItemRequest, MealRequest, NutritionApi};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::io::Write;
use tracing::{info, warn};

pub const DEMO_MEAL_NAME: &str = "Healthy Breakfast";

/// What to create.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPlan {
    pub food: FoodItemDetails,
    pub meal_name: String,
}

impl SeedPlan {
    pub fn demo() -> Self {
        SeedPlan {
            food: FoodItemDetails::apple(),
            meal_name: DEMO_MEAL_NAME.into(),
        }
    }
}

/// Step whose response lacked an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FoodItem,
    Meal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Completed { food_item_id: String, meal_id: String },
    Aborted(Step),
}

/// Create the food item, then the meal, then add the meal to today's log,
/// writing each raw response to `out`. Transport failures are returned as
/// errors; a missing identifier is reported on `out` and ends the run
/// with `SeedOutcome::Aborted`.
pub fn seed<A, W>(api: &A, user_id: &str, plan: &SeedPlan, today: NaiveDate, out: &mut W) -> Result<SeedOutcome>
where
    A: NutritionApi + ?Sized,
    W: Write,
{
    let food_item = api.create_food_item(&FoodItemRequest::new(user_id, plan.food.clone()))?;
    writeln!(out, "Food item created: {}", food_item).context("Writing output")?;

    let Some(food_item_id) = response_id(&food_item) else {
        log_server_message(Step::FoodItem, &food_item);
        writeln!(out, "Food item creation failed. Cannot proceed with meal creation.").context("Writing output")?;
        return Ok(SeedOutcome::Aborted(Step::FoodItem));
    };
    info!(%food_item_id, "food item created");

    let meal = api.create_meal(&MealRequest::new(user_id, &plan.meal_name, &food_item_id))?;
    writeln!(out, "Meal created: {}", meal).context("Writing output")?;

    let Some(meal_id) = response_id(&meal) else {
        log_server_message(Step::Meal, &meal);
        writeln!(out, "Meal creation failed. Cannot proceed with adding meal to daily log.").context("Writing output")?;
        return Ok(SeedOutcome::Aborted(Step::Meal));
    };
    info!(%meal_id, "meal created");

    let log = api.add_meal_to_daily_log(&DailyLogRequest::breakfast(user_id, &meal_id, today))?;
    writeln!(out, "Meal added to daily log: {}", log).context("Writing output")?;

    Ok(SeedOutcome::Completed { food_item_id, meal_id })
}

// Error responses from the service look like `{ "title": .., "message": .. }`.
fn log_server_message(step: Step, body: &Value) {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        warn!(?step, server_message = message, "service rejected request");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        FoodItem(Value),
        Meal(Value),
        DailyLog(Value),
    }

    /// Replays canned responses in order and records every request body.
    struct Recording {
        responses: RefCell<VecDeque<Value>>,
        calls: RefCell<Vec<Call>>,
    }

    impl Recording {
        fn new(responses: Vec<Value>) -> Self {
            Recording {
                responses: RefCell::new(responses.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn next(&self, call: Call) -> Result<Value> {
            self.calls.borrow_mut().push(call);
            self.responses
                .borrow_mut()
                .pop_front()
                .context("unexpected request")
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl NutritionApi for Recording {
        fn create_food_item(&self, req: &FoodItemRequest) -> Result<Value> {
            self.next(Call::FoodItem(serde_json::to_value(req)?))
        }

        fn create_meal(&self, req: &MealRequest) -> Result<Value> {
            self.next(Call::Meal(serde_json::to_value(req)?))
        }

        fn add_meal_to_daily_log(&self, req: &DailyLogRequest) -> Result<Value> {
            self.next(Call::DailyLog(serde_json::to_value(req)?))
        }
    }

    fn march_5() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn run(api: &Recording) -> (Result<SeedOutcome>, String) {
        let mut out = Vec::new();
        let res = seed(api, "u1", &SeedPlan::demo(), march_5(), &mut out);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn full_run_chains_ids() {
        let api = Recording::new(vec![json!({ "_id": "f1" }), json!({ "_id": "m1" }), json!({ "updated": true })]);
        let (res, out) = run(&api);

        assert_eq!(
            res.unwrap(),
            SeedOutcome::Completed {
                food_item_id: "f1".into(),
                meal_id: "m1".into()
            }
        );
        assert_eq!(
            out,
            "Food item created: {\"_id\":\"f1\"}\n\
             Meal created: {\"_id\":\"m1\"}\n\
             Meal added to daily log: {\"updated\":true}\n"
        );

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(&calls[0], Call::FoodItem(body) if body["name"] == "Apple" && body["userId"] == "u1"));
        assert_eq!(
            calls[1],
            Call::Meal(json!({
                "userId": "u1",
                "name": "Healthy Breakfast",
                "foodEntries": [{ "foodItem": "f1", "grams": 100 }],
                "isSavedInCollection": true
            }))
        );
        assert_eq!(
            calls[2],
            Call::DailyLog(json!({
                "userId": "u1",
                "date": "03052024",
                "meals": { "breakfast": ["m1"], "lunch": [], "dinner": [], "snacks": [] }
            }))
        );
    }

    #[test]
    fn food_item_without_id_stops_after_one_call() {
        let api = Recording::new(vec![json!({})]);
        let (res, out) = run(&api);

        assert_eq!(res.unwrap(), SeedOutcome::Aborted(Step::FoodItem));
        assert_eq!(api.calls().len(), 1);
        assert!(out.contains("Food item created: {}"));
        assert!(out.contains("Food item creation failed."));
    }

    #[test]
    fn empty_food_item_id_counts_as_missing() {
        let api = Recording::new(vec![json!({ "_id": "" })]);
        let (res, _) = run(&api);
        assert_eq!(res.unwrap(), SeedOutcome::Aborted(Step::FoodItem));
        assert_eq!(api.calls().len(), 1);
    }

    #[test]
    fn meal_without_id_skips_daily_log() {
        let api = Recording::new(vec![
            json!({ "_id": "f1" }),
            json!({ "title": "Validation failed", "message": "name is required" }),
        ]);
        let (res, out) = run(&api);

        assert_eq!(res.unwrap(), SeedOutcome::Aborted(Step::Meal));
        assert_eq!(api.calls().len(), 2);
        assert!(out.contains("Meal creation failed. Cannot proceed with adding meal to daily log."));
        assert!(!out.contains("daily log: "));
    }

    #[test]
    fn transport_error_propagates() {
        let api = Recording::new(vec![json!({ "_id": "f1" })]);
        let (res, out) = run(&api);

        assert!(res.is_err());
        assert_eq!(api.calls().len(), 2);
        assert!(out.contains("Food item created"));
        assert!(!out.contains("Meal created"));
    }
}
