//! Producto Entity
//!
//! A product row as stored. `id_producto` is supplied by the caller on
//! creation, never generated; the rest of the fields are overwritten as a
//! whole on every edit.

use rust_decimal::Decimal;

/// Product record
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Producto {
    /// Caller-supplied unique id (not auto-generated)
    pub id_producto: i32,
    pub nombre: String,
    pub precio_venta: Decimal,
    pub cantidad: i32,
    pub stock_minimo: i32,
    /// `/static/<archivo>` convention, or empty when no photo was uploaded
    pub ruta_foto: String,
}

impl Producto {
    /// Stock at or below the configured minimum
    pub fn bajo_stock(&self) -> bool {
        self.cantidad <= self.stock_minimo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn producto(cantidad: i32, stock_minimo: i32) -> Producto {
        Producto {
            id_producto: 1,
            nombre: "Tornillo".to_string(),
            precio_venta: Decimal::from_str("5.50").unwrap(),
            cantidad,
            stock_minimo,
            ruta_foto: String::new(),
        }
    }

    #[test]
    fn test_bajo_stock() {
        assert!(producto(5, 10).bajo_stock());
        assert!(producto(10, 10).bajo_stock());
        assert!(!producto(11, 10).bajo_stock());
    }
}
