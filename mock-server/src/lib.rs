use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: Option<String>,
    pub available_quantity: f64,
}

#[derive(Deserialize)]
pub struct NewMaterial {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub color: Option<String>,
    #[serde(default)]
    pub available_quantity: f64,
}

#[derive(Deserialize)]
pub struct MaterialUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub color: Option<String>,
    pub available_quantity: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub order_number: String,
    pub material_id: u64,
    pub quantity_kg: f64,
    pub priority: u32,
    pub status: OrderStatus,
    pub equipment_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct NewOrder {
    pub order_number: String,
    pub material_id: u64,
    pub quantity_kg: f64,
    #[serde(default = "default_priority")]
    pub priority: u32,
}

fn default_priority() -> u32 {
    1
}

#[derive(Deserialize)]
pub struct OrderUpdate {
    pub equipment_id: Option<u64>,
    pub status: Option<OrderStatus>,
    pub priority: Option<u32>,
}

fn default_limit() -> usize {
    100
}

#[derive(Deserialize)]
pub struct MaterialFilter {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub type_filter: Option<String>,
}

#[derive(Deserialize)]
pub struct OrderFilter {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub status: Option<OrderStatus>,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    materials: BTreeMap<u64, Material>,
    orders: BTreeMap<u64, Order>,
}

impl Store {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

/// A 4xx answer carrying FastAPI-style `{"detail": ...}`.
type ApiFailure = (StatusCode, Json<Value>);

fn failure(status: StatusCode, detail: &str) -> ApiFailure {
    (status, Json(json!({ "detail": detail })))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", get(root))
        .route("/materials", get(list_materials).post(create_material))
        .route(
            "/materials/{id}",
            get(get_material).put(update_material).delete(delete_material),
        )
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order).put(update_order).delete(delete_order))
        .route(
            "/echo/headers",
            get(echo_headers)
                .post(echo_headers)
                .put(echo_headers)
                .delete(echo_headers),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "production planning API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// Request headers as a `{name: value}` object, names lowercased. Repeated
/// headers are joined with `", "`.
async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &headers {
        let Ok(value) = value.to_str() else { continue };
        seen.entry(name.as_str().to_string())
            .and_modify(|v| {
                v.push_str(", ");
                v.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    Json(seen)
}

// --- materials ---

async fn list_materials(
    State(db): State<Db>,
    Query(filter): Query<MaterialFilter>,
) -> Json<Vec<Material>> {
    let store = db.read().await;
    let materials = store
        .materials
        .values()
        .filter(|m| filter.type_filter.as_deref().map_or(true, |t| m.kind == t))
        .skip(filter.skip)
        .take(filter.limit)
        .cloned()
        .collect();
    Json(materials)
}

async fn create_material(
    State(db): State<Db>,
    Json(input): Json<NewMaterial>,
) -> (StatusCode, Json<Material>) {
    let mut store = db.write().await;
    let material = Material {
        id: store.allocate_id(),
        name: input.name,
        kind: input.kind,
        color: input.color,
        available_quantity: input.available_quantity,
    };
    store.materials.insert(material.id, material.clone());
    tracing::debug!(id = material.id, "material created");
    (StatusCode::CREATED, Json(material))
}

async fn get_material(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Material>, ApiFailure> {
    let store = db.read().await;
    store
        .materials
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "material not found"))
}

async fn update_material(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<MaterialUpdate>,
) -> Result<Json<Material>, ApiFailure> {
    let mut store = db.write().await;
    let material = store
        .materials
        .get_mut(&id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "material not found"))?;
    if let Some(name) = input.name {
        material.name = name;
    }
    if let Some(kind) = input.kind {
        material.kind = kind;
    }
    if let Some(color) = input.color {
        material.color = Some(color);
    }
    if let Some(quantity) = input.available_quantity {
        material.available_quantity = quantity;
    }
    Ok(Json(material.clone()))
}

async fn delete_material(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiFailure> {
    let mut store = db.write().await;
    if store.orders.values().any(|o| o.material_id == id) {
        return Err(failure(StatusCode::BAD_REQUEST, "material is used by orders"));
    }
    let material = store
        .materials
        .remove(&id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "material not found"))?;
    Ok(Json(json!({ "message": format!("material {} deleted", material.name) })))
}

// --- orders ---

async fn list_orders(State(db): State<Db>, Query(filter): Query<OrderFilter>) -> Json<Vec<Order>> {
    let store = db.read().await;
    let orders = store
        .orders
        .values()
        .filter(|o| filter.status.map_or(true, |s| o.status == s))
        .skip(filter.skip)
        .take(filter.limit)
        .cloned()
        .collect();
    Json(orders)
}

async fn create_order(
    State(db): State<Db>,
    Json(input): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ApiFailure> {
    let mut store = db.write().await;
    if !store.materials.contains_key(&input.material_id) {
        return Err(failure(StatusCode::BAD_REQUEST, "material not found"));
    }
    let order = Order {
        id: store.allocate_id(),
        order_number: input.order_number,
        material_id: input.material_id,
        quantity_kg: input.quantity_kg,
        priority: input.priority,
        status: OrderStatus::Pending,
        equipment_id: None,
    };
    store.orders.insert(order.id, order.clone());
    tracing::debug!(id = order.id, "order created");
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Order>, ApiFailure> {
    let store = db.read().await;
    store
        .orders
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "order not found"))
}

async fn update_order(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<OrderUpdate>,
) -> Result<Json<Order>, ApiFailure> {
    let mut store = db.write().await;
    let order = store
        .orders
        .get_mut(&id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "order not found"))?;
    if let Some(equipment_id) = input.equipment_id {
        order.equipment_id = Some(equipment_id);
    }
    if let Some(status) = input.status {
        order.status = status;
    }
    if let Some(priority) = input.priority {
        order.priority = priority;
    }
    Ok(Json(order.clone()))
}

async fn delete_order(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiFailure> {
    let mut store = db.write().await;
    let order = store
        .orders
        .get(&id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "order not found"))?;
    if order.status == OrderStatus::InProgress {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "an order in progress cannot be deleted",
        ));
    }
    let order_number = order.order_number.clone();
    store.orders.remove(&id);
    Ok(Json(json!({ "message": format!("order {order_number} deleted") })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_serializes_type_field() {
        let material = Material {
            id: 1,
            name: "LDPE film".to_string(),
            kind: "film".to_string(),
            color: None,
            available_quantity: 250.0,
        };
        let json = serde_json::to_value(&material).unwrap();
        assert_eq!(json["type"], "film");
        assert!(json.get("kind").is_none());
        assert_eq!(json["color"], Value::Null);
    }

    #[test]
    fn order_status_uses_snake_case() {
        let json = serde_json::to_value(OrderStatus::InProgress).unwrap();
        assert_eq!(json, "in_progress");
        let back: OrderStatus = serde_json::from_str(r#""scheduled""#).unwrap();
        assert_eq!(back, OrderStatus::Scheduled);
    }

    #[test]
    fn new_order_defaults_priority() {
        let input: NewOrder =
            serde_json::from_str(r#"{"order_number":"A-1","material_id":1,"quantity_kg":12.5}"#).unwrap();
        assert_eq!(input.priority, 1);
    }

    #[test]
    fn new_order_rejects_missing_material() {
        let result: Result<NewOrder, _> = serde_json::from_str(r#"{"order_number":"A-1","quantity_kg":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn order_update_all_fields_optional() {
        let input: OrderUpdate = serde_json::from_str("{}").unwrap();
        assert!(input.status.is_none());
        assert!(input.priority.is_none());
        assert!(input.equipment_id.is_none());
    }

    #[test]
    fn store_ids_are_monotonic() {
        let mut store = Store::default();
        assert_eq!(store.allocate_id(), 1);
        assert_eq!(store.allocate_id(), 2);
    }
}
