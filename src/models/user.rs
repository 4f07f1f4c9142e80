use crate::entities::user_entity;
use crate::services::{TelegramProfile, VehicleUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpsertUserRequest {
    #[schema(example = "Aibek")]
    pub first_name: String,
    pub last_name: Option<String>,
    #[schema(example = "aibek_kg")]
    pub username: Option<String>,
}

impl UpsertUserRequest {
    pub fn into_profile(self, telegram_id: i64) -> TelegramProfile {
        TelegramProfile {
            telegram_id,
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateVehicleRequest {
    #[schema(example = "Toyota Camry")]
    pub car_make: Option<String>,
    #[schema(example = "white")]
    pub car_color: Option<String>,
    #[schema(example = "01KG123ABC")]
    pub car_plate: Option<String>,
}

impl From<UpdateVehicleRequest> for VehicleUpdate {
    fn from(r: UpdateVehicleRequest) -> Self {
        Self {
            car_make: r.car_make,
            car_color: r.car_color,
            car_plate: r.car_plate,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub telegram_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub display_name: String,
    pub no_show_count: i32,
    pub car_make: Option<String>,
    pub car_color: Option<String>,
    pub car_plate: Option<String>,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user_entity::Model> for UserResponse {
    fn from(m: user_entity::Model) -> Self {
        Self {
            display_name: m.display_name(),
            id: m.id,
            telegram_id: m.telegram_id,
            first_name: m.first_name,
            last_name: m.last_name,
            username: m.username,
            no_show_count: m.no_show_count,
            car_make: m.car_make,
            car_color: m.car_color,
            car_plate: m.car_plate,
            is_blocked: m.is_blocked,
            created_at: m.created_at,
        }
    }
}

/// What a passenger sees about a driver or a driver about a passenger
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub telegram_id: i64,
    pub display_name: String,
    pub username: Option<String>,
    pub no_show_count: i32,
}

impl From<&user_entity::Model> for UserSummary {
    fn from(m: &user_entity::Model) -> Self {
        Self {
            telegram_id: m.telegram_id,
            display_name: m.display_name(),
            username: m.username.clone(),
            no_show_count: m.no_show_count,
        }
    }
}
