use quarry_core::query::grammar::{self, QueryGrammar};
use quarry_core::schema::{self, Table};
use quarry_core::{op, raw, table, Value};

fn main() {
    // SELECT with tuple conditions and a nested group
    let select_query = table("users")
        .select(("id", "name", "email"))
        .where_(("age", op::GT, 18))         // Using op constants
        .where_(("status", "active"))        // Defaults to EQ
        .where_nested(|q| {
            q.where_(("city", "LIKE", "%York%"))
                .or_where(("role", "admin"))
        })
        .order_by("name", "asc")
        .for_page(2, 15);

    for driver in ["mysql", "sqlite", "pgsql", "sqlsrv"] {
        let grammar = grammar::for_driver(driver, "");
        println!("[{driver}] SELECT SQL: {}", grammar.compile_select(&select_query).unwrap());
    }
    println!("Bindings: {:?}", select_query.bindings());

    // Joins and aggregates-friendly grouping
    let report = table("orders as o")
        .select(("u.name", "o.total"))
        .join("users as u", "u.id", "=", "o.user_id")
        .where_between("o.total", 100, 500)
        .where_not_null("o.shipped_at")
        .group_by("u.name")
        .having(("o.total", op::GT, 250));

    let mysql = grammar::for_driver("mysql", "shop_");
    println!("Report SQL: {}", mysql.compile_select(&report).unwrap());

    // Raw expressions are inlined and never bound
    let recent = table("posts")
        .where_(("published_at", op::GT, raw("NOW() - INTERVAL 7 DAY")))
        .where_in("category_id", vec![1, 2, 3]);
    println!("Recent SQL: {}", mysql.compile_select(&recent).unwrap());
    println!("Recent bindings: {:?}", recent.bindings());

    // Schema blueprint compiled for each dialect
    for driver in ["mysql", "sqlite", "pgsql", "sqlsrv"] {
        let mut users = Table::new("users");
        users.create();
        users.increments("id");
        users.string("email", Some(120)).unique();
        users.boolean("admin").defaults(Value::Bool(false));
        users.timestamps();

        let grammar = schema::grammar::for_driver(driver, "").unwrap();
        for sql in schema::build(&mut users, grammar.as_ref()).unwrap() {
            println!("[{driver}] {sql}");
        }
    }
}
