//! Sea-ORM entities for products and their category links.

pub mod product {
    use sea_orm::ActiveValue::Set;
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    use crate::models::{NewProduct, Product, ProductSummary};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub code: String,
        pub name: String,
        #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
        pub price: Decimal,
        pub quantity: i32,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::product_category::Entity")]
        ProductCategories,
    }

    impl Related<super::product_category::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::ProductCategories.def()
        }
    }

    impl Related<domain_categories::entity::Entity> for Entity {
        fn to() -> RelationDef {
            super::product_category::Relation::Category.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::product_category::Relation::Product.def().rev())
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl Model {
        pub const TAG: &'static str = "Products";

        pub fn into_product(self, categories: Vec<String>) -> Product {
            Product {
                id: self.id,
                code: self.code,
                name: self.name,
                price: self.price,
                quantity: self.quantity,
                categories,
                created_at: self.created_at.into(),
                updated_at: self.updated_at.into(),
            }
        }
    }

    impl From<Model> for ProductSummary {
        fn from(model: Model) -> Self {
            Self {
                code: model.code,
                name: model.name,
                price: model.price,
            }
        }
    }

    impl From<NewProduct> for ActiveModel {
        fn from(input: NewProduct) -> Self {
            let now = chrono::Utc::now();

            ActiveModel {
                id: Set(Uuid::now_v7()),
                code: Set(input.code),
                name: Set(input.name),
                price: Set(input.price),
                quantity: Set(input.quantity),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
        }
    }
}

pub mod product_category {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    /// Row of the `product_categories` join table
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "product_categories")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub product_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub category_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::product::Entity",
            from = "Column::ProductId",
            to = "super::product::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Product,
        #[sea_orm(
            belongs_to = "domain_categories::entity::Entity",
            from = "Column::CategoryId",
            to = "domain_categories::entity::Column::Id",
            on_update = "Cascade",
            on_delete = "Cascade"
        )]
        Category,
    }

    impl Related<super::product::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Product.def()
        }
    }

    impl Related<domain_categories::entity::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Category.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
