use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use crate::db::RecordRepository;
use crate::domain::{
    derive_view, regions, toggle_picked_up_today, DayZone, PickupHistory, RecordFields, RecordId,
    RecordUpdate, ViewQuery,
};
use crate::errors::ServerError;
use crate::responses::{
    html_response, json_response, redirect, static_file_response, xlsx_response, ResultResp,
};
use crate::spreadsheets::{export_filename, export_records_xlsx};
use crate::templates::pages::{index_page, record_list, IndexVm};
use crate::templates::record_form_modal;
use astra::Request;
use url::form_urlencoded;

/// Everything a request handler needs. Built once in `main`.
pub struct AppState<R> {
    pub records: R,
    pub static_dir: PathBuf,
}

impl<R: RecordRepository> AppState<R> {
    fn zone(&self) -> DayZone {
        *self.records.zone()
    }
}

pub fn handle<R: RecordRepository>(req: Request, state: &AppState<R>) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let query = req.uri().query().map(str::to_owned);
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", [""]) => index(state, query.as_deref()),
        ("GET", ["records"]) => list_partial(state, query.as_deref()),
        ("GET", ["records", "new"]) => {
            let view = ViewQuery::from_query_string(query.as_deref())?;
            html_response(record_form_modal(None, &view.to_query_string()))
        }
        ("GET", ["records", id, "edit"]) => edit_form(state, RecordId::new(*id), query.as_deref()),
        ("POST", ["records"]) => create(state, read_form(req)?),
        ("POST", ["records", id]) => update(state, RecordId::new(*id), read_form(req)?),
        ("POST", ["records", id, "delete"]) => delete(state, RecordId::new(*id), read_form(req)?),
        ("POST", ["records", id, "pickup"]) => {
            toggle_pickup(state, RecordId::new(*id), read_form(req)?)
        }
        ("GET", ["export.xlsx"]) => export(state, query.as_deref()),
        ("GET", ["api", "records"]) => api_records(state, query.as_deref()),
        ("GET", ["static", file]) => static_file_response(&state.static_dir, file),
        _ => Err(ServerError::NotFound),
    }
}

fn index<R: RecordRepository>(state: &AppState<R>, query: Option<&str>) -> ResultResp {
    let view_query = ViewQuery::from_query_string(query)?;
    let records = state.records.list_resolved()?;
    let today = state.zone().today();

    html_response(index_page(&IndexVm {
        views: derive_view(&records, &view_query, today),
        regions: regions(&records),
        query: view_query,
        histories: HashMap::new(),
    }))
}

fn list_partial<R: RecordRepository>(state: &AppState<R>, query: Option<&str>) -> ResultResp {
    let view_query = ViewQuery::from_query_string(query)?;
    let records = state.records.list_resolved()?;
    let views = derive_view(&records, &view_query, state.zone().today());

    html_response(record_list(&views, &view_query, &HashMap::new()))
}

fn edit_form<R: RecordRepository>(
    state: &AppState<R>,
    id: RecordId,
    query: Option<&str>,
) -> ResultResp {
    let view_query = ViewQuery::from_query_string(query)?;
    let record = state
        .records
        .list_resolved()?
        .into_iter()
        .find(|r| r.id == id)
        .ok_or(ServerError::NotFound)?;

    html_response(record_form_modal(Some(&record), &view_query.to_query_string()))
}

fn create<R: RecordRepository>(state: &AppState<R>, form: Vec<(String, String)>) -> ResultResp {
    let back = return_location(&form)?;
    let fields = RecordFields::from_form(form)?;
    state.records.create(&fields)?;
    redirect(&back)
}

fn update<R: RecordRepository>(
    state: &AppState<R>,
    id: RecordId,
    form: Vec<(String, String)>,
) -> ResultResp {
    let back = return_location(&form)?;
    let fields = RecordFields::from_form(form)?;
    state.records.update(&id, &RecordUpdate::Replace(fields))?;
    redirect(&back)
}

fn delete<R: RecordRepository>(
    state: &AppState<R>,
    id: RecordId,
    form: Vec<(String, String)>,
) -> ResultResp {
    let back = return_location(&form)?;
    state.records.delete(&id)?;
    redirect(&back)
}

/// Flip "picked up today" for one record and re-render the whole list.
///
/// The page posts every card's undo slot (`prev.<id>`) along with the
/// current view, so slots of other cards survive the re-render.
fn toggle_pickup<R: RecordRepository>(
    state: &AppState<R>,
    id: RecordId,
    form: Vec<(String, String)>,
) -> ResultResp {
    let view_query = view_query_from_form(&form)?;
    let mut histories = histories_from_form(&form)?;
    let today = state.zone().today();

    let mut records = state.records.list_resolved()?;
    let record = records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(ServerError::NotFound)?;

    let history = histories.remove(&id).unwrap_or_default();
    let toggled = toggle_picked_up_today(record.last_pickup, history, today);

    state
        .records
        .update(&id, &RecordUpdate::LastPickup(toggled.last_pickup))?;
    record.last_pickup = toggled.last_pickup;

    if toggled.history != PickupHistory::default() {
        histories.insert(id, toggled.history);
    }

    let views = derive_view(&records, &view_query, today);
    html_response(record_list(&views, &view_query, &histories))
}

fn export<R: RecordRepository>(state: &AppState<R>, query: Option<&str>) -> ResultResp {
    let view_query = ViewQuery::from_query_string(query)?;
    let records = state.records.list_resolved()?;
    let today = state.zone().today();

    let buffer = export_records_xlsx(&derive_view(&records, &view_query, today))?;
    xlsx_response(buffer, &export_filename(today))
}

fn api_records<R: RecordRepository>(state: &AppState<R>, query: Option<&str>) -> ResultResp {
    let view_query = ViewQuery::from_query_string(query)?;
    let records = state.records.list_resolved()?;

    json_response(&derive_view(&records, &view_query, state.zone().today()))
}

fn read_form(req: Request) -> Result<Vec<(String, String)>, ServerError> {
    let mut bytes = Vec::new();
    req.into_body()
        .reader()
        .read_to_end(&mut bytes)
        .map_err(|e| ServerError::BadRequest(format!("could not read form body: {e}")))?;

    Ok(form_urlencoded::parse(&bytes).into_owned().collect())
}

fn form_value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
    form.iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// The view the form was opened from, re-validated so a redirect can only
/// ever point back at the list.
fn view_query_from_form(form: &[(String, String)]) -> Result<ViewQuery, ServerError> {
    let raw = form_value(form, "return_to").unwrap_or_default();
    Ok(ViewQuery::from_query_string(Some(raw))?)
}

fn return_location(form: &[(String, String)]) -> Result<String, ServerError> {
    let query = view_query_from_form(form)?.to_query_string();
    Ok(if query.is_empty() {
        "/".to_string()
    } else {
        format!("/?{query}")
    })
}

fn histories_from_form(
    form: &[(String, String)],
) -> Result<HashMap<RecordId, PickupHistory>, ServerError> {
    form.iter()
        .filter_map(|(key, value)| key.strip_prefix("prev.").map(|id| (id, value)))
        .map(|(id, value)| {
            let history = PickupHistory::from_form_value(Some(value.as_str())).map_err(|e| {
                ServerError::BadRequest(format!("bad pickup history for {id}: {e}"))
            })?;
            Ok((RecordId::new(id), history))
        })
        .collect()
}
