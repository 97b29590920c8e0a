use eyre::Result;
use kitchen_core::{CreateTicketResponse, KitchenStore, StatusCode, Ticket, TicketId};
use kitchen_tests::ApiResponse;

/// Checks the status of a response that must have been answered.
#[allow(unused)]
pub fn assert_status(response: &ApiResponse, want: StatusCode) -> Result<()> {
    let got = response.status()?;
    assert_eq!(got, want, "got status {got}, want {want}");
    Ok(())
}

/// Checks that a failed request was answered with `want` and nothing else.
#[allow(unused)]
pub fn assert_bare_status(response: &ApiResponse, want: StatusCode) -> Result<()> {
    assert_status(response, want)?;
    assert!(!response.has_body(), "a {want} response must not carry a body");
    Ok(())
}

/// Checks a creation response and returns the ID it carries.
#[allow(unused)]
pub fn assert_created(response: &ApiResponse) -> Result<TicketId> {
    assert_status(response, StatusCode::Accepted)?;
    let CreateTicketResponse { id } = response.json()?;
    Ok(id)
}

/// Checks that the store holds exactly `want` under `want.id`.
#[allow(unused)]
pub fn assert_ticket_persisted<S: KitchenStore>(store: &S, want: &Ticket) {
    match store.ticket_by_id(want.id) {
        Ok(got) => assert_eq!(&got, want, "server didn't persist correct order"),
        Err(err) => panic!("server didn't persist order, {err}"),
    }
}
