//! PostgreSQL integration tests
//!
//! These pin the SQL-level semantics the in-memory tests cannot: LIKE
//! filtering, STRING_AGG over the empty set, duplicate keys and the
//! foreign-key restriction on delete. They need a disposable database:
//!
//! ```sh
//! DATABASE_URL=postgres://... cargo test -p tienda --test postgres -- --ignored
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use tienda::PgTiendaRepository;
use tienda::TiendaError;
use tienda::domain::entity::producto::Producto;
use tienda::domain::repository::{ClienteRepository, ProductoRepository};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for these tests");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("cannot connect to the test database");
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await
        .expect("migrations failed");
    pool
}

fn producto(id_producto: i32, nombre: &str) -> Producto {
    Producto {
        id_producto,
        nombre: nombre.to_string(),
        precio_venta: Decimal::from_str("5.50").unwrap(),
        cantidad: 100,
        stock_minimo: 10,
        ruta_foto: String::new(),
    }
}

async fn borrar_producto(pool: &PgPool, id: i32) {
    sqlx::query("DELETE FROM productos WHERE id_producto = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn test_like_filtra_por_substring_y_vacio_devuelve_todo() {
    let pool = pool().await;
    let repo = PgTiendaRepository::new(pool.clone());

    repo.insertar_producto(&producto(9101, "Tornillo prueba")).await.unwrap();
    repo.insertar_producto(&producto(9102, "Clavo prueba")).await.unwrap();

    let filtrado = repo.buscar_productos(Some("Tornillo")).await.unwrap();
    assert!(filtrado.iter().any(|p| p.id_producto == 9101));
    assert!(!filtrado.iter().any(|p| p.id_producto == 9102));

    let todos = repo.buscar_productos(None).await.unwrap();
    assert!(todos.iter().any(|p| p.id_producto == 9101));
    assert!(todos.iter().any(|p| p.id_producto == 9102));

    borrar_producto(&pool, 9101).await;
    borrar_producto(&pool, 9102).await;
}

#[tokio::test]
#[ignore]
async fn test_string_agg_sin_telefonos_es_cadena_vacia() {
    let pool = pool().await;
    let repo = PgTiendaRepository::new(pool.clone());

    sqlx::query("INSERT INTO clientes (id_cliente, nombre, apellido) VALUES ($1, $2, $3)")
        .bind(9001)
        .bind("ClientePrueba")
        .bind("ConTelefonos")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO clientes (id_cliente, nombre, apellido) VALUES ($1, $2, $3)")
        .bind(9002)
        .bind("ClientePrueba")
        .bind("SinTelefonos")
        .execute(&pool)
        .await
        .unwrap();
    for numero in ["555-2222", "555-1111"] {
        sqlx::query("INSERT INTO cliente_telefonos (id_cliente, numero_telefono) VALUES ($1, $2)")
            .bind(9001)
            .bind(numero)
            .execute(&pool)
            .await
            .unwrap();
    }

    let clientes = repo.buscar_clientes(Some("ClientePrueba")).await.unwrap();
    assert_eq!(clientes.len(), 2);

    let con = clientes.iter().find(|c| c.id_cliente == 9001).unwrap();
    assert_eq!(con.telefonos, "555-1111, 555-2222");

    // LEFT JOIN + aggregate over zero rows: exactly one row, and the
    // COALESCE pins the value to an empty string, not NULL
    let sin = clientes.iter().find(|c| c.id_cliente == 9002).unwrap();
    assert_eq!(sin.telefonos, "");

    sqlx::query("DELETE FROM clientes WHERE id_cliente IN ($1, $2)")
        .bind(9001)
        .bind(9002)
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn test_insertar_id_duplicado() {
    let pool = pool().await;
    let repo = PgTiendaRepository::new(pool.clone());

    repo.insertar_producto(&producto(9201, "Original")).await.unwrap();

    let resultado = repo.insertar_producto(&producto(9201, "Impostor")).await;
    assert!(matches!(resultado, Err(TiendaError::IdDuplicado)));

    // the original row is untouched
    let fila = repo.obtener_producto(9201).await.unwrap().unwrap();
    assert_eq!(fila.nombre, "Original");

    borrar_producto(&pool, 9201).await;
}

#[tokio::test]
#[ignore]
async fn test_eliminar_inexistente_cero_filas() {
    let pool = pool().await;
    let repo = PgTiendaRepository::new(pool);

    let filas = repo.eliminar_producto(999_999).await.unwrap();
    assert_eq!(filas, 0);
}

#[tokio::test]
#[ignore]
async fn test_eliminar_facturado_falla_con_violacion_fk() {
    let pool = pool().await;
    let repo = PgTiendaRepository::new(pool.clone());

    repo.insertar_producto(&producto(9301, "Facturado")).await.unwrap();

    let id_factura: i32 =
        sqlx::query_scalar("INSERT INTO facturas (id_cliente) VALUES (NULL) RETURNING id_factura")
            .fetch_one(&pool)
            .await
            .unwrap();
    sqlx::query(
        "INSERT INTO detalle_facturas (id_factura, id_producto, cantidad, precio) VALUES ($1, $2, $3, $4)",
    )
    .bind(id_factura)
    .bind(9301)
    .bind(1)
    .bind(Decimal::from_str("5.50").unwrap())
    .execute(&pool)
    .await
    .unwrap();

    let resultado = repo.eliminar_producto(9301).await;
    assert!(matches!(
        resultado,
        Err(TiendaError::ReferenciadoPorFactura)
    ));

    // once the invoice is gone the delete goes through
    sqlx::query("DELETE FROM facturas WHERE id_factura = $1")
        .bind(id_factura)
        .execute(&pool)
        .await
        .unwrap();
    let filas = repo.eliminar_producto(9301).await.unwrap();
    assert_eq!(filas, 1);
}
