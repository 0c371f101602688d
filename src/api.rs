// API client module: a small blocking HTTP client for the nutrition
// service plus the JSON payloads it sends. Responses are kept as raw
// `serde_json::Value` because the seeder only needs the `_id` field and
// echoes everything else back to the terminal.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Grams recorded for every food entry the seeder puts in a meal.
pub const DEFAULT_GRAMS: u32 = 100;

/// Operations the seeder needs from the nutrition service. `ApiClient`
/// talks HTTP; tests substitute a recording fake.
pub trait NutritionApi {
    fn create_food_item(&self, req: &FoodItemRequest) -> Result<Value>;
    fn create_meal(&self, req: &MealRequest) -> Result<Value>;
    fn add_meal_to_daily_log(&self, req: &DailyLogRequest) -> Result<Value>;
}

/// Blocking client holding the base URL of the service and the bearer
/// token sent with every request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Macro and micro values of a food item. Only calories are numeric on
/// the wire; the rest are free-form strings such as `"0.3g"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Nutrition {
    pub calories: u32,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub sodium: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemDetails {
    pub name: String,
    pub nutrition: Nutrition,
    pub is_default: bool,
}

impl FoodItemDetails {
    /// The demo food item created by the seeder.
    pub fn apple() -> Self {
        FoodItemDetails {
            name: "Apple".into(),
            nutrition: Nutrition {
                calories: 52,
                protein: "0.3g".into(),
                carbs: "14g".into(),
                fat: "0.2g".into(),
                sodium: "1mg".into(),
            },
            is_default: false,
        }
    }
}

/// Body of `POST /api/foodItems`: the owner id merged with the details.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub details: FoodItemDetails,
}

impl FoodItemRequest {
    pub fn new(user_id: &str, details: FoodItemDetails) -> Self {
        FoodItemRequest {
            user_id: user_id.to_string(),
            details,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub food_item: String,
    pub grams: u32,
}

/// Body of `POST /api/meals`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealRequest {
    pub user_id: String,
    pub name: String,
    pub food_entries: Vec<FoodEntry>,
    pub is_saved_in_collection: bool,
}

impl MealRequest {
    /// A meal made of a single food item at `DEFAULT_GRAMS`, saved to the
    /// user's collection.
    pub fn new(user_id: &str, name: &str, food_item_id: &str) -> Self {
        MealRequest {
            user_id: user_id.to_string(),
            name: name.to_string(),
            food_entries: vec![FoodEntry {
                food_item: food_item_id.to_string(),
                grams: DEFAULT_GRAMS,
            }],
            is_saved_in_collection: true,
        }
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct MealSlots {
    pub breakfast: Vec<String>,
    pub lunch: Vec<String>,
    pub dinner: Vec<String>,
    pub snacks: Vec<String>,
}

/// Body of `PUT /api/dailyLogs`.
///
/// The log only ever contains the one meal being added. If the service
/// replaces the day's log on PUT, meals logged earlier that day are lost.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogRequest {
    pub user_id: String,
    pub date: String,
    pub meals: MealSlots,
}

impl DailyLogRequest {
    /// A log for `date` with `meal_id` as the only breakfast entry.
    pub fn breakfast(user_id: &str, meal_id: &str, date: NaiveDate) -> Self {
        DailyLogRequest {
            user_id: user_id.to_string(),
            date: log_date(date),
            meals: MealSlots {
                breakfast: vec![meal_id.to_string()],
                ..MealSlots::default()
            },
        }
    }
}

/// Date key used by the daily log endpoint: `MMDDYYYY`, zero padded.
pub fn log_date(date: NaiveDate) -> String {
    date.format("%m%d%Y").to_string()
}

/// Extract the `_id` of a created resource. Empty strings, `null` and
/// nested values do not count as an identifier.
pub fn response_id(body: &Value) -> Option<String> {
    match body.get("_id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl ApiClient {
    /// Build a client for `base_url` that authenticates with `token`.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let val = format!("Bearer {}", self.token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&val).context("Token is not a valid header value")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Send `body` as JSON and parse whatever JSON comes back. A non-2xx
    /// status is not an error here: the service's error envelope is
    /// returned like any other body.
    fn send_json<B: Serialize>(&self, method: Method, path: &str, body: &B, what: &str) -> Result<Value> {
        let url = format!("{}{}", &self.base_url, path);
        debug!(%method, %url, "sending {what} request");
        let res = self
            .client
            .request(method, &url)
            .headers(self.headers()?)
            .json(body)
            .send()
            .with_context(|| format!("Failed to send {what} request"))?;
        let status = res.status();
        if !status.is_success() {
            warn!(%status, %url, "{what} request was not successful");
        }
        let value: Value = res
            .json()
            .with_context(|| format!("Parsing {what} response json"))?;
        Ok(value)
    }
}

impl NutritionApi for ApiClient {
    fn create_food_item(&self, req: &FoodItemRequest) -> Result<Value> {
        self.send_json(Method::POST, "/api/foodItems", req, "food item")
    }

    fn create_meal(&self, req: &MealRequest) -> Result<Value> {
        self.send_json(Method::POST, "/api/meals", req, "meal")
    }

    fn add_meal_to_daily_log(&self, req: &DailyLogRequest) -> Result<Value> {
        self.send_json(Method::PUT, "/api/dailyLogs", req, "daily log")
    }
}
