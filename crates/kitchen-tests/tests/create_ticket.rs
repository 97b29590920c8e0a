use eyre::Result;
use kitchen_core::{NewTicket, RequestMethod, StatusCode, Ticket, TicketStatus};
use kitchen_service::InMemoryKitchenStore;
use kitchen_tests::{FailingKitchenStore, StubKitchenStore, TestCtxBuilder};
use util::{assert_bare_status, assert_created, assert_status, assert_ticket_persisted};

mod util;

#[tokio::test]
#[ntest::timeout(10_000)]
async fn returns_accepted_on_valid_ticket_json() -> Result<()> {
    let ctx = TestCtxBuilder::new().build(StubKitchenStore::default());

    let response = ctx.api.order(["burger", "fries"]).await?;
    assert_status(&response, StatusCode::Accepted)?;

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn returns_ids_assigned_by_the_store() -> Result<()> {
    let ctx = TestCtxBuilder::new().build(StubKitchenStore::default());

    assert_eq!(assert_created(&ctx.api.order(["burger", "fries"]).await?)?, 0);
    assert_eq!(assert_created(&ctx.api.order(["pizza", "water"]).await?)?, 1);

    let response = ctx.api.order(["salad"]).await?;
    let body = response.body.clone().unwrap_or_default();
    assert_eq!(String::from_utf8(body)?, "{\"ID\":2}\n");

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn persists_ticket_and_sets_status_to_pending() -> Result<()> {
    let ctx = TestCtxBuilder::new().build(InMemoryKitchenStore::new());

    let request = NewTicket {
        id: Some(42),
        status: Some(TicketStatus::Completed as i64),
        items: Some(vec!["pizza".into(), "water".into()]),
    };
    let id = assert_created(&ctx.api.create_ticket(&request).await?)?;
    assert_eq!(id, 1, "the first ID of the in-memory store is 1");

    let want = Ticket::new(id, TicketStatus::Pending, ["pizza", "water"]);
    assert_ticket_persisted(&*ctx.store, &want);

    let got: Ticket = ctx.api.get_ticket(id).await?.json()?;
    assert_eq!(got, want);

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn accepts_empty_items_and_lowercase_fields() -> Result<()> {
    let ctx = TestCtxBuilder::new().build(StubKitchenStore::default());

    let id = assert_created(&ctx.api.create_ticket_raw(r#"{"Items": []}"#).await?)?;
    let want = Ticket::new(id, TicketStatus::Pending, Vec::<String>::new());
    assert_ticket_persisted(&*ctx.store, &want);

    let body = r#"{"id": 9, "status": 7, "items": ["tea"]}"#;
    let id = assert_created(&ctx.api.create_ticket_raw(body).await?)?;
    assert_ticket_persisted(&*ctx.store, &Ticket::new(id, TicketStatus::Pending, ["tea"]));

    let body = r#"{"ID": null, "Status": null, "Items": ["cake"]}"#;
    assert_created(&ctx.api.create_ticket_raw(body).await?)?;

    assert_eq!(ctx.store.tickets().len(), 3);
    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn matches_field_names_regardless_of_case() -> Result<()> {
    let ctx = TestCtxBuilder::new().build(StubKitchenStore::default());

    for body in [
        r#"{"ITEMS": ["tea"]}"#,
        r#"{"iTeMs": ["tea"], "sTaTuS": 2, "Id": 5}"#,
    ] {
        let id = assert_created(&ctx.api.create_ticket_raw(body).await?)?;
        assert_ticket_persisted(&*ctx.store, &Ticket::new(id, TicketStatus::Pending, ["tea"]));
    }

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn ignores_data_after_the_ticket_json() -> Result<()> {
    let ctx = TestCtxBuilder::new().build(StubKitchenStore::default());

    for body in [
        r#"{"Items": ["burger"]} {"junk": 1}"#,
        r#"{"Items": ["burger"]}not json at all"#,
    ] {
        let id = assert_created(&ctx.api.create_ticket_raw(body).await?)?;
        assert_ticket_persisted(&*ctx.store, &Ticket::new(id, TicketStatus::Pending, ["burger"]));
    }

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn later_duplicate_fields_win() -> Result<()> {
    let ctx = TestCtxBuilder::new().build(StubKitchenStore::default());

    let body = r#"{"Items": ["burger"], "items": ["pizza", "water"]}"#;
    let id = assert_created(&ctx.api.create_ticket_raw(body).await?)?;
    let want = Ticket::new(id, TicketStatus::Pending, ["pizza", "water"]);
    assert_ticket_persisted(&*ctx.store, &want);

    let body = r#"{"Items": null, "Items": ["soup"]}"#;
    let id = assert_created(&ctx.api.create_ticket_raw(body).await?)?;
    assert_ticket_persisted(&*ctx.store, &Ticket::new(id, TicketStatus::Pending, ["soup"]));

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn null_items_are_stored_as_empty_strings() -> Result<()> {
    let ctx = TestCtxBuilder::new().build(StubKitchenStore::default());

    let body = r#"{"Items": [null, "fries", null]}"#;
    let id = assert_created(&ctx.api.create_ticket_raw(body).await?)?;
    let want = Ticket::new(id, TicketStatus::Pending, ["", "fries", ""]);
    assert_ticket_persisted(&*ctx.store, &want);

    let got: Ticket = ctx.api.get_ticket(id).await?.json()?;
    assert_eq!(got, want);

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn returns_bad_request_on_invalid_ticket_json() -> Result<()> {
    let ctx = TestCtxBuilder::new().build(StubKitchenStore::default());

    for body in [
        r#"{"text": "this is an invalid ticket JSON"}"#,
        r#"{"Items": ["burger"], "Table": 4}"#,
        r#"{"Status": 0}"#,
        r#"{"Items": null}"#,
        r#"{"Items": ["burger"], "Items": null}"#,
        r#"{"Items": ["burger"], "Itemz": []}"#,
        r#"{"Items": "burger"}"#,
        r#"{"Items": ["burger"], "ID": "one"}"#,
        r#"{"Items": ["burger"], "Status": 1.5}"#,
        r#"["burger"]"#,
        r#"{"Items": ["burger""#,
        "",
        " \n ",
    ] {
        let response = ctx.api.create_ticket_raw(body).await?;
        assert_bare_status(&response, StatusCode::BadRequest)?;
    }

    assert!(ctx.store.tickets().is_empty(), "rejected tickets must not be stored");
    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn returns_bad_request_when_the_store_fails() -> Result<()> {
    let ctx = TestCtxBuilder::new().build(FailingKitchenStore);

    let response = ctx.api.order(["burger", "fries"]).await?;
    assert_bare_status(&response, StatusCode::BadRequest)?;

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn post_is_accepted_on_any_path() -> Result<()> {
    let ctx = TestCtxBuilder::new().build(StubKitchenStore::default());

    let body = r#"{"Items": ["soup"]}"#;
    let response = ctx.api.request(RequestMethod::Post, "/anything", body).await?;
    assert_eq!(assert_created(&response)?, 0);

    ctx.finish().await;
    Ok(())
}
