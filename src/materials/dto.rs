use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::materials::repo::{Material, MaterialChanges, NewMaterial};

#[derive(Debug, Deserialize)]
pub struct CreateMaterialRequest {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub unit: String,
}

impl From<CreateMaterialRequest> for NewMaterial {
    fn from(req: CreateMaterialRequest) -> Self {
        NewMaterial {
            name: req.name,
            quantity: req.quantity,
            price: req.price,
            unit: req.unit,
        }
    }
}

/// Any subset of the four fields; omitted ones are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMaterialRequest {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub unit: Option<String>,
}

impl From<UpdateMaterialRequest> for MaterialChanges {
    fn from(req: UpdateMaterialRequest) -> Self {
        MaterialChanges {
            name: req.name,
            quantity: req.quantity,
            price: req.price,
            unit: req.unit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MaterialResponse {
    pub id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub unit: String,
}

impl From<Material> for MaterialResponse {
    fn from(m: Material) -> Self {
        MaterialResponse {
            id: m.id,
            name: m.name,
            quantity: m.quantity,
            price: m.price,
            unit: m.unit,
        }
    }
}
