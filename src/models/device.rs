use crate::models::Timestamps;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceEntity {
    pub serial_number: String,
    pub name: Option<String>,
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}
