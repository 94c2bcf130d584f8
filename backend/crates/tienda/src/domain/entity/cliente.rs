//! Cliente Entity
//!
//! Customers are read-only in this system: they are listed and searched,
//! never created or edited here.

/// Customer record
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Cliente {
    pub id_cliente: i32,
    pub nombre: String,
    pub apellido: String,
}

/// Customer with all phone numbers aggregated for display
///
/// `telefonos` is a comma-joined string ("555-1111, 555-2222"); a customer
/// with no phone rows carries an empty string, never a missing value.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ClienteConTelefonos {
    pub id_cliente: i32,
    pub nombre: String,
    pub apellido: String,
    pub telefonos: String,
}
