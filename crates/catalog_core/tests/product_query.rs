use catalog_core::db::migrations::apply_migrations;
use catalog_core::db::open_db_in_memory;
use catalog_core::{
    FieldValue, NewProduct, PageRequest, Predicate, Product, ProductDao, ProductField,
    ProductQuery, ProductRepository, Projection, QueryError, RepoError, Sort, SortOrder,
    SqliteProductDao, SqliteProductRepository,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn seed(conn: &Connection, rows: &[(&str, i64, i64)]) -> Vec<Product> {
    let dao = SqliteProductDao::try_new(conn).unwrap();
    rows.iter()
        .map(|(name, price, stock)| {
            dao.insert_product(&NewProduct::new(*name, *price, *stock))
                .unwrap()
        })
        .collect()
}

fn pens_and_eraser(conn: &Connection) -> Vec<Product> {
    seed(
        conn,
        &[
            ("펜", 1000, 100),
            ("펜", 5000, 300),
            ("펜", 500, 50),
            ("지우개", 700, 20),
        ],
    )
}

fn prices(products: &[Product]) -> Vec<i64> {
    products.iter().map(|product| product.price).collect()
}

#[test]
fn find_by_name_returns_only_exact_matches() {
    let conn = open_db_in_memory().unwrap();
    let seeded = pens_and_eraser(&conn);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let found = repo.find_by_name("펜").unwrap();
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|product| product.name == "펜"));

    let expected: HashSet<_> = seeded[..3].iter().map(|p| p.number).collect();
    let actual: HashSet<_> = found.iter().map(|p| p.number).collect();
    assert_eq!(actual, expected);

    assert!(repo.find_by_name("연필").unwrap().is_empty());
}

#[test]
fn find_by_name_sorted_by_price_ascending() {
    let conn = open_db_in_memory().unwrap();
    pens_and_eraser(&conn);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let sorted = repo
        .find_by_name_sorted("펜", Sort::by([SortOrder::asc(ProductField::Price)]))
        .unwrap();
    assert_eq!(prices(&sorted), vec![500, 1000, 5000]);
}

#[test]
fn multi_key_sort_uses_later_keys_for_ties() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, &[("펜", 1000, 10), ("펜", 1000, 30), ("펜", 500, 20)]);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let sort = Sort::by([
        SortOrder::asc(ProductField::Price),
        SortOrder::desc(ProductField::Stock),
    ]);
    let sorted = repo.find_by_name_sorted("펜", sort).unwrap();
    let pairs: Vec<_> = sorted.iter().map(|p| (p.price, p.stock)).collect();
    assert_eq!(pairs, vec![(500, 20), (1000, 30), (1000, 10)]);
}

#[test]
fn first_page_reports_totals() {
    let conn = open_db_in_memory().unwrap();
    pens_and_eraser(&conn);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let page = repo
        .find_by_name_paged("펜", PageRequest::of(0, 2).unwrap())
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
    assert!(page.is_first());
    assert!(page.has_next());
}

#[test]
fn pages_cover_every_match_exactly_once() {
    let conn = open_db_in_memory().unwrap();
    let rows: Vec<(&str, i64, i64)> = (0..11).map(|i| ("펜", 100 * (i % 4), i)).collect();
    seed(&conn, &rows);
    seed(&conn, &[("지우개", 1, 1)]);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let query = ProductQuery::new()
        .filter(Predicate::name_eq("펜"))
        .order_by(Sort::by([SortOrder::asc(ProductField::Price)]));
    let mut request = PageRequest::of(0, 3).unwrap();
    let mut seen = HashSet::new();
    let mut total_items = 0;
    loop {
        let page = repo.fetch_page(&query, request).unwrap();
        assert_eq!(page.total_elements, 11);
        assert_eq!(page.total_pages, 4);
        total_items += page.items.len();
        for product in &page.items {
            assert!(seen.insert(product.number), "product appeared twice");
        }
        if page.is_last() {
            break;
        }
        request = request.next();
    }
    assert_eq!(total_items, 11);
    assert_eq!(seen.len(), 11);
}

#[test]
fn page_past_the_end_is_empty_with_totals() {
    let conn = open_db_in_memory().unwrap();
    pens_and_eraser(&conn);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let page = repo
        .find_by_name_paged("펜", PageRequest::of(9, 2).unwrap())
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
}

#[test]
fn find_by_name_param_matches_find_by_name() {
    let conn = open_db_in_memory().unwrap();
    pens_and_eraser(&conn);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    assert_eq!(
        repo.find_by_name_param("펜").unwrap(),
        repo.find_by_name("펜").unwrap()
    );
}

#[test]
fn projection_returns_fields_in_declared_order() {
    let conn = open_db_in_memory().unwrap();
    pens_and_eraser(&conn);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let projection = Projection::of([ProductField::Price, ProductField::Name]).unwrap();
    let query = ProductQuery::new()
        .filter(Predicate::name_eq("펜"))
        .order_by(Sort::by([SortOrder::asc(ProductField::Price)]));
    let rows = repo.fetch_projection(&query, &projection).unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0].values,
        vec![FieldValue::Integer(500), FieldValue::Text("펜".to_string())]
    );
    assert_eq!(rows[2].get(ProductField::Price), Some(&FieldValue::Integer(5000)));
    assert_eq!(rows[2].get(ProductField::Stock), None);
}

#[test]
fn name_param_projection_selects_single_field() {
    let conn = open_db_in_memory().unwrap();
    pens_and_eraser(&conn);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let projection = Projection::parse("name").unwrap();
    let rows = repo
        .find_by_name_param_projection("지우개", &projection)
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values.len(), 1);
    assert_eq!(rows[0].values[0].as_str(), Some("지우개"));
}

#[test]
fn find_one_with_contains_and_price_range() {
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[("볼펜", 800, 1), ("만년펜", 2000, 1), ("PEN", 1500, 1), ("지우개", 1200, 1)],
    );
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let found = repo
        .find_one(Predicate::name_contains("펜").and(Predicate::price_between(1000, 2500)))
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "만년펜");

    let missing = repo
        .find_one(Predicate::name_contains("펜").and(Predicate::price_between(3000, 4000)))
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn find_all_with_case_insensitive_contains() {
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[("Pen", 500, 1), ("pencil", 1500, 1), ("PEN case", 900, 1), ("eraser", 700, 1)],
    );
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let predicate =
        Predicate::name_contains_ignore_case("pen").and(Predicate::price_between(500, 1000));
    let found = repo.find_all(predicate).unwrap();
    let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Pen", "PEN case"]);
}

#[test]
fn count_and_stock_filter() {
    let conn = open_db_in_memory().unwrap();
    pens_and_eraser(&conn);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let query = ProductQuery::new().filter(Predicate::stock_between(50, 100));
    assert_eq!(repo.count(&query).unwrap(), 2);
    assert_eq!(repo.count(&ProductQuery::new()).unwrap(), 4);
}

#[test]
fn user_text_in_filters_is_bound_not_executed() {
    let conn = open_db_in_memory().unwrap();
    pens_and_eraser(&conn);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let found = repo.find_by_name("펜' OR '1'='1").unwrap();
    assert!(found.is_empty());
    assert_eq!(repo.count(&ProductQuery::new()).unwrap(), 4);
}

#[test]
fn invalid_query_shapes_convert_to_repo_errors() {
    let err: RepoError = PageRequest::of(0, 0).unwrap_err().into();
    assert!(matches!(err, RepoError::InvalidQuery(QueryError::ZeroPageSize)));

    let err: RepoError = Sort::parse("colour").unwrap_err().into();
    assert!(matches!(err, RepoError::InvalidQuery(QueryError::UnknownField(_))));
}

#[test]
fn case_insensitive_contains_folds_non_ascii_letters() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, &[("ÄPFEL Stift", 900, 5), ("ÉCOLE pen", 1200, 8)]);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let apfel = repo
        .find_all(Predicate::name_contains_ignore_case("äpfel"))
        .unwrap();
    assert_eq!(apfel.len(), 1);
    assert_eq!(apfel[0].name, "ÄPFEL Stift");

    let ecole = repo
        .find_all(Predicate::name_contains_ignore_case("école"))
        .unwrap();
    assert_eq!(ecole.len(), 1);
    assert_eq!(ecole[0].name, "ÉCOLE pen");
}

#[test]
fn repository_on_host_migrated_connection_folds_case() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    seed(&conn, &[("ÄPFEL Stift", 900, 5)]);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let found = repo
        .find_all(Predicate::name_contains_ignore_case("Äpfel"))
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn fetch_page_joins_an_open_caller_transaction() {
    let conn = open_db_in_memory().unwrap();
    pens_and_eraser(&conn);

    let tx = conn.unchecked_transaction().unwrap();
    {
        seed(&tx, &[("펜", 2000, 10)]);
        let repo = SqliteProductRepository::try_new(&tx).unwrap();
        let page = repo
            .find_by_name_paged("펜", PageRequest::of(0, 10).unwrap())
            .unwrap();
        assert_eq!(page.total_elements, 4);
        assert_eq!(page.items.len(), 4);
    }
    assert!(!conn.is_autocommit());
    tx.rollback().unwrap();

    let repo = SqliteProductRepository::try_new(&conn).unwrap();
    assert_eq!(repo.find_by_name("펜").unwrap().len(), 3);
}

#[test]
fn fetch_page_leaves_autocommit_connection_in_autocommit() {
    let conn = open_db_in_memory().unwrap();
    pens_and_eraser(&conn);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let page = repo
        .fetch_page(&ProductQuery::new(), PageRequest::of(1, 3).unwrap())
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total_elements, 4);
    assert!(conn.is_autocommit());
}

#[test]
fn page_envelope_serializes_with_camel_case_totals() {
    let conn = open_db_in_memory().unwrap();
    pens_and_eraser(&conn);
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let page = repo
        .find_by_name_paged("펜", PageRequest::of(0, 2).unwrap())
        .unwrap();
    let json = serde_json::to_value(&page).unwrap();

    let keys: HashSet<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        HashSet::from(["items", "page", "size", "totalElements", "totalPages"])
    );
    assert_eq!(json["page"], 0);
    assert_eq!(json["size"], 2);
    assert_eq!(json["totalElements"], 3);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["items"][0]["name"], "펜");
    assert!(json["items"][0]["createdAt"].is_i64());
}
