use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "alumni")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub first_name: String,

    pub last_name: String,

    #[sea_orm(unique)]
    pub email: String,

    pub phone: String,

    /// Graduation year
    pub year: Option<i32>,

    pub course: String,

    pub company: String,

    pub position: String,

    pub country: String,

    pub city: String,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    pub is_verified: bool,

    pub paid: bool,

    /// Original filename of the payment proof
    pub payment_proof: Option<String>,

    #[sea_orm(column_type = "Blob", nullable)]
    pub payment_proof_data: Option<Vec<u8>>,

    /// Declared MIME type of the payment proof
    pub payment_proof_type: Option<String>,

    /// Byte length of the stored payment proof
    pub payment_proof_size: Option<i64>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
