use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, SellerId, Sku};
use domain::{Order, OrderLineItem, OrderStatus, PaymentMethod, PaymentTerms};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Customer, CustomerStore, OrderFilter, OrderStore, Result, StoreError,
};

/// PostgreSQL-backed order store.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: &PgRow) -> Result<Order> {
        let status_str: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status_str)
            .ok_or_else(|| StoreError::InvalidColumn(format!("order status '{status_str}'")))?;

        let terms_str: String = row.try_get("payment_terms")?;
        let payment_terms = PaymentTerms::parse(&terms_str)
            .ok_or_else(|| StoreError::InvalidColumn(format!("payment terms '{terms_str}'")))?;

        let payment_method = row
            .try_get::<Option<String>, _>("payment_method")?
            .map(|m| {
                PaymentMethod::parse(&m)
                    .ok_or_else(|| StoreError::InvalidColumn(format!("payment method '{m}'")))
            })
            .transpose()?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            order_number: row.try_get("order_number")?,
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            seller_id: SellerId::new(row.try_get::<String, _>("seller_id")?),
            seller_name: row.try_get("seller_name")?,
            order_date: row.try_get::<DateTime<Utc>, _>("order_date")?,
            status,
            subtotal: row.try_get::<Decimal, _>("subtotal")?,
            discount_amount: row.try_get::<Decimal, _>("discount_amount")?,
            tax_amount: row.try_get::<Decimal, _>("tax_amount")?,
            total_amount: row.try_get::<Decimal, _>("total_amount")?,
            payment_terms,
            payment_method,
            delivery_address: row.try_get("delivery_address")?,
            delivery_city: row.try_get("delivery_city")?,
            delivery_department: row.try_get("delivery_department")?,
            preferred_distribution_center: row.try_get("preferred_distribution_center")?,
            notes: row.try_get("notes")?,
            items: Vec::new(),
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }

    fn row_to_item(row: &PgRow) -> Result<OrderLineItem> {
        let quantity: i64 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity)
            .map_err(|_| StoreError::InvalidColumn(format!("item quantity {quantity}")))?;

        Ok(OrderLineItem {
            id: row.try_get::<Uuid, _>("id")?,
            product_sku: Sku::new(row.try_get::<String, _>("product_sku")?),
            product_name: row.try_get("product_name")?,
            quantity,
            unit_price: row.try_get::<Decimal, _>("unit_price")?,
            discount_percentage: row.try_get::<Decimal, _>("discount_percentage")?,
            tax_percentage: row.try_get::<Decimal, _>("tax_percentage")?,
            subtotal: row.try_get::<Decimal, _>("subtotal")?,
            discount_amount: row.try_get::<Decimal, _>("discount_amount")?,
            tax_amount: row.try_get::<Decimal, _>("tax_amount")?,
            total: row.try_get::<Decimal, _>("total")?,
            distribution_center_code: row.try_get("distribution_center_code")?,
            stock_confirmed: row.try_get("stock_confirmed")?,
            stock_confirmation_date: row
                .try_get::<Option<DateTime<Utc>>, _>("stock_confirmation_date")?,
        })
    }

    async fn insert_order_row(
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, customer_id, seller_id, seller_name, order_date,
                status, subtotal, discount_amount, tax_amount, total_amount,
                payment_terms, payment_method, delivery_address, delivery_city,
                delivery_department, preferred_distribution_center, notes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(&order.order_number)
        .bind(order.customer_id.as_uuid())
        .bind(order.seller_id.as_str())
        .bind(&order.seller_name)
        .bind(order.order_date)
        .bind(order.status.as_str())
        .bind(order.subtotal)
        .bind(order.discount_amount)
        .bind(order.tax_amount)
        .bind(order.total_amount)
        .bind(order.payment_terms.as_str())
        .bind(order.payment_method.map(|m| m.as_str()))
        .bind(&order.delivery_address)
        .bind(&order.delivery_city)
        .bind(&order.delivery_department)
        .bind(&order.preferred_distribution_center)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn insert_items(
        tx: &mut Transaction<'_, Postgres>,
        order_id: OrderId,
        items: &[OrderLineItem],
    ) -> Result<()> {
        for (line_no, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, line_no, product_sku, product_name, quantity,
                    unit_price, discount_percentage, tax_percentage,
                    subtotal, discount_amount, tax_amount, total,
                    distribution_center_code, stock_confirmed, stock_confirmation_date
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                "#,
            )
            .bind(item.id)
            .bind(order_id.as_uuid())
            .bind(line_no as i64)
            .bind(item.product_sku.as_str())
            .bind(&item.product_name)
            .bind(i64::from(item.quantity))
            .bind(item.unit_price)
            .bind(item.discount_percentage)
            .bind(item.tax_percentage)
            .bind(item.subtotal)
            .bind(item.discount_amount)
            .bind(item.tax_amount)
            .bind(item.total)
            .bind(&item.distribution_center_code)
            .bind(item.stock_confirmed)
            .bind(item.stock_confirmation_date)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    async fn load_items(&self, order_ids: &[Uuid]) -> Result<Vec<(Uuid, OrderLineItem)>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, line_no, product_sku, product_name, quantity,
                   unit_price, discount_percentage, tax_percentage,
                   subtotal, discount_amount, tax_amount, total,
                   distribution_center_code, stock_confirmed, stock_confirmation_date
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, line_no ASC
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let order_id: Uuid = row.try_get("order_id")?;
                Ok((order_id, Self::row_to_item(row)?))
            })
            .collect()
    }

    /// Computes the next `ORD-YYYYMMDD-NNNN` number for the order date.
    ///
    /// Runs inside the create transaction so the count and the insert
    /// see the same state.
    async fn next_order_number(
        tx: &mut Transaction<'_, Postgres>,
        order_date: DateTime<Utc>,
    ) -> Result<String> {
        let date_key = order_date.format("%Y%m%d").to_string();
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE order_number LIKE $1")
                .bind(format!("ORD-{date_key}-%"))
                .fetch_one(&mut **tx)
                .await?;

        Ok(format!("ORD-{date_key}-{:04}", count + 1))
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    async fn create(&self, mut order: Order) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        order.order_number = Self::next_order_number(&mut tx, order.order_date).await?;
        Self::insert_order_row(&mut tx, &order).await?;
        Self::insert_items(&mut tx, order.id, &order.items).await?;

        tx.commit().await?;
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, order_number, customer_id, seller_id, seller_name, order_date,
                   status, subtotal, discount_amount, tax_amount, total_amount,
                   payment_terms, payment_method, delivery_address, delivery_city,
                   delivery_department, preferred_distribution_center, notes,
                   created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut order = Self::row_to_order(&row)?;
        order.items = self
            .load_items(&[id.as_uuid()])
            .await?
            .into_iter()
            .map(|(_, item)| item)
            .collect();

        Ok(Some(order))
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let mut sql = String::from(
            "SELECT id, order_number, customer_id, seller_id, seller_name, order_date, \
             status, subtotal, discount_amount, tax_amount, total_amount, \
             payment_terms, payment_method, delivery_address, delivery_city, \
             delivery_department, preferred_distribution_center, notes, \
             created_at, updated_at \
             FROM orders WHERE 1=1",
        );
        let mut param_count = 0;

        if filter.customer_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND customer_id = ${param_count}"));
        }
        if filter.seller_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND seller_id = ${param_count}"));
        }
        if filter.status.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND status = ${param_count}"));
        }

        sql.push_str(" ORDER BY order_date DESC");

        let mut query = sqlx::query(&sql);
        if let Some(customer_id) = filter.customer_id {
            query = query.bind(customer_id.as_uuid());
        }
        if let Some(ref seller_id) = filter.seller_id {
            query = query.bind(seller_id.as_str().to_string());
        }
        if let Some(status) = filter.status {
            query = query.bind(status.as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;
        let mut orders: Vec<Order> = rows
            .iter()
            .map(Self::row_to_order)
            .collect::<Result<_>>()?;

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id.as_uuid()).collect();
        if !ids.is_empty() {
            let mut items_by_order = std::collections::HashMap::<Uuid, Vec<OrderLineItem>>::new();
            for (order_id, item) in self.load_items(&ids).await? {
                items_by_order.entry(order_id).or_default().push(item);
            }
            for order in &mut orders {
                if let Some(items) = items_by_order.remove(&order.id.as_uuid()) {
                    order.items = items;
                }
            }
        }

        Ok(orders)
    }

    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    async fn update(&self, order: &Order) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = $2, subtotal = $3, discount_amount = $4, tax_amount = $5,
                total_amount = $6, payment_terms = $7, payment_method = $8,
                delivery_address = $9, delivery_city = $10, delivery_department = $11,
                preferred_distribution_center = $12, notes = $13, updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.status.as_str())
        .bind(order.subtotal)
        .bind(order.discount_amount)
        .bind(order.tax_amount)
        .bind(order.total_amount)
        .bind(order.payment_terms.as_str())
        .bind(order.payment_method.map(|m| m.as_str()))
        .bind(&order.delivery_address)
        .bind(&order.delivery_city)
        .bind(&order.delivery_department)
        .bind(&order.preferred_distribution_center)
        .bind(&order.notes)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::OrderNotFound(order.id));
        }

        // Items are replaced wholesale, never merged.
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order.id.as_uuid())
            .execute(&mut *tx)
            .await?;
        Self::insert_items(&mut tx, order.id, &order.items).await?;

        tx.commit().await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: OrderId) -> Result<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::OrderNotFound(id));
        }

        Ok(())
    }
}

#[async_trait]
impl CustomerStore for PostgresOrderStore {
    async fn customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, business_name, address, city, department, is_active
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Customer {
                id: CustomerId::from_uuid(row.try_get::<Uuid, _>("id")?),
                business_name: row.try_get("business_name")?,
                address: row.try_get("address")?,
                city: row.try_get("city")?,
                department: row.try_get("department")?,
                is_active: row.try_get("is_active")?,
            })),
            None => Ok(None),
        }
    }
}
