// UI layer: wraps API calls in an `indicatif` spinner so the terminal
// shows what the seeder is waiting on. The spinner draws on stderr and
// is hidden when stderr is not a terminal, so stdout stays clean.

use crate::api::{DailyLogRequest, FoodItemRequest, MealRequest, NutritionApi};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;

/// `NutritionApi` decorator that shows a spinner during each call.
pub struct Spinning<A> {
    inner: A,
}

impl<A: NutritionApi> Spinning<A> {
    pub fn new(inner: A) -> Self {
        Spinning { inner }
    }

    fn with_spinner<T>(&self, msg: &'static str, call: impl FnOnce(&A) -> Result<T>) -> Result<T> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
        spinner.set_message(msg);
        spinner.enable_steady_tick(Duration::from_millis(80));
        let res = call(&self.inner);
        spinner.finish_and_clear();
        res
    }
}

impl<A: NutritionApi> NutritionApi for Spinning<A> {
    fn create_food_item(&self, req: &FoodItemRequest) -> Result<Value> {
        self.with_spinner("Creating food item...", |api| api.create_food_item(req))
    }

    fn create_meal(&self, req: &MealRequest) -> Result<Value> {
        self.with_spinner("Creating meal...", |api| api.create_meal(req))
    }

    fn add_meal_to_daily_log(&self, req: &DailyLogRequest) -> Result<Value> {
        self.with_spinner("Updating daily log...", |api| api.add_meal_to_daily_log(req))
    }
}
