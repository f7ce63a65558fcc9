use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub activity: Option<String>,
    #[sea_orm(column_name = "type")]
    pub kind: Option<String>,
    pub participants: Option<i64>,
    pub price: Option<f64>,
    pub link: Option<String>,
    pub key: Option<String>,
    pub accessibility: Option<f64>,
}

impl ActiveModelBehavior for ActiveModel {}
