use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxCredentialRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxDocumentRepo {
    pub pool: PgPool,
}
