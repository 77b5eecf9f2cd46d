use crate::domain::{
    material::{
        entity::{Material, MaterialFilters, MaterialSort},
        repository::MaterialRepository,
    },
    shared::{errors::DomainError, pagination::PaginationRequest},
    user::entity::UserRef,
};
use crate::infrastructure::database::errors::map_sqlx_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, instrument};
use uuid::Uuid;

const MATERIAL_COLUMNS: &str = "SELECT m.id, m.title, m.description, m.material_type, m.area, \
            m.keywords, m.file_name, m.file_size, m.file_type, \
            m.author_id, u.display_name AS author_name, \
            m.total_download, m.total_view, \
            (SELECT COUNT(*) FROM comments c WHERE c.material_id = m.id)::bigint AS comment_count, \
            m.created_at \
     FROM materials m \
     JOIN users u ON u.id = m.author_id";

#[derive(FromRow)]
struct MaterialRow {
    id: i64,
    title: String,
    description: Option<String>,
    material_type: String,
    area: String,
    keywords: Vec<String>,
    file_name: String,
    file_size: Option<String>,
    file_type: Option<String>,
    author_id: Uuid,
    author_name: String,
    total_download: i64,
    total_view: i64,
    comment_count: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<MaterialRow> for Material {
    type Error = DomainError;

    fn try_from(r: MaterialRow) -> Result<Self, Self::Error> {
        Ok(Material {
            id: r.id,
            title: r.title,
            description: r.description,
            material_type: r.material_type.parse()?,
            area: r.area.parse()?,
            keywords: r.keywords,
            file_name: r.file_name,
            file_size: r.file_size,
            file_type: r.file_type,
            author: UserRef::new(r.author_id, r.author_name),
            total_download: r.total_download,
            total_view: r.total_view,
            comment_count: r.comment_count,
            created_at: r.created_at,
        })
    }
}

/// `%term%` with the ILIKE wildcards inside `term` matched literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn apply_material_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &MaterialFilters) {
    qb.push(" WHERE TRUE");

    if let Some(term) = filters.search_term() {
        let pattern = contains_pattern(term);
        qb.push(" AND (m.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR m.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if !filters.types.is_empty() {
        let codes: Vec<String> = filters.types.iter().map(|t| t.code().to_string()).collect();
        qb.push(" AND m.material_type = ANY(").push_bind(codes).push(")");
    }

    if !filters.areas.is_empty() {
        let codes: Vec<String> = filters.areas.iter().map(|a| a.code().to_string()).collect();
        qb.push(" AND m.area = ANY(").push_bind(codes).push(")");
    }

    if let Some(after) = filters.created_after(Utc::now()) {
        qb.push(" AND m.created_at >= ").push_bind(after);
    }

    if let Some(min) = filters.min_downloads {
        qb.push(" AND m.total_download >= ").push_bind(min);
    }

    if let Some(author_id) = filters.author_id {
        qb.push(" AND m.author_id = ").push_bind(author_id);
    }
}

fn order_clause(sort: MaterialSort) -> &'static str {
    match sort {
        MaterialSort::Recent => " ORDER BY m.created_at DESC, m.id DESC",
        MaterialSort::Downloads => " ORDER BY m.total_download DESC, m.id DESC",
        MaterialSort::Views => " ORDER BY m.total_view DESC, m.id DESC",
    }
}

pub struct SqlxMaterialRepository {
    pub pool: PgPool,
}

impl SqlxMaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxMaterialRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl MaterialRepository for SqlxMaterialRepository {
    async fn exists_by_id(&self, id: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM materials WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Material>, DomainError> {
        let sql = format!("{} WHERE m.id = $1", MATERIAL_COLUMNS);
        sqlx::query_as::<_, MaterialRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .map(Material::try_from)
            .transpose()
    }

    #[instrument(skip(self, filters), fields(sort = ?filters.sort))]
    async fn find_page(
        &self,
        filters: &MaterialFilters,
        page: PaginationRequest,
    ) -> Result<(Vec<Material>, i64), DomainError> {
        let mut count_qb = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*)::bigint FROM materials m JOIN users u ON u.id = m.author_id",
        );
        apply_material_filters(&mut count_qb, filters);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut data_qb = QueryBuilder::<Postgres>::new(MATERIAL_COLUMNS);
        apply_material_filters(&mut data_qb, filters);
        data_qb
            .push(order_clause(filters.sort))
            .push(" LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset);

        let rows: Vec<MaterialRow> = data_qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!(rows = rows.len(), total, "material page loaded");

        let materials = rows
            .into_iter()
            .map(Material::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((materials, total))
    }

    async fn increment_view_count(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE materials SET total_view = total_view + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() == 1)
    }

    async fn record_download(&self, id: i64) -> Result<Option<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            "UPDATE materials SET total_download = total_download + 1 \
             WHERE id = $1 RETURNING file_name",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn top_keywords(&self, limit: i64) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            "SELECT kw FROM materials m CROSS JOIN LATERAL unnest(m.keywords) AS kw \
             GROUP BY kw ORDER BY COUNT(*) DESC, kw ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    #[instrument(skip(self))]
    async fn delete_owned(&self, id: i64, author_id: Uuid) -> Result<bool, DomainError> {
        // Comments and ratings cascade; triggers drop likes on the material and its comments.
        let result = sqlx::query("DELETE FROM materials WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() == 1)
    }
}
