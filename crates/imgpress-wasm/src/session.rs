//! Browser-side image list bound to a processing endpoint.
//!
//! ```typescript
//! import init, { Session, archive_name } from '@imgpress/wasm';
//!
//! await init();
//! const session = new Session('/api/process');
//!
//! for (const file of input.files) {
//!     const bytes = new Uint8Array(await file.arrayBuffer());
//!     session.add_file(file.name, file.type, bytes, URL.createObjectURL(file));
//! }
//!
//! await session.process_all();
//! const zip = session.export_archive();
//! saveAs(new Blob([zip]), archive_name());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use imgpress_core::{
    record_outcomes, run_jobs, EntryId, EntryList, HttpTranscoder, JobOutcome, NewFile, SettingsUpdate,
};
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::types::{js_error, parse_format, quality_from_js, to_js};

/// Log each failed outcome to the browser console.
fn report_failures(outcomes: &[JobOutcome]) {
    for outcome in outcomes {
        if let Err(err) = &outcome.result {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "imgpress: image {} failed: {err}",
                outcome.id
            )));
        }
    }
}

/// Image list plus the endpoint its entries are sent to.
///
/// The list lives behind `Rc<RefCell<..>>` so that `process` and
/// `process_all` can hand it to a promise. Borrows are never held across an
/// await, so the UI may keep calling methods while requests are in flight.
#[wasm_bindgen]
pub struct Session {
    list: Rc<RefCell<EntryList>>,
    transcoder: Rc<HttpTranscoder>,
}

#[wasm_bindgen]
impl Session {
    /// Create an empty session posting to `endpoint` (e.g. `/api/process`).
    #[wasm_bindgen(constructor)]
    pub fn new(endpoint: String) -> Session {
        Session {
            list: Rc::new(RefCell::new(EntryList::new())),
            transcoder: Rc::new(HttpTranscoder::new(endpoint)),
        }
    }

    /// Add one file as a pending entry and return its id.
    ///
    /// # Arguments
    ///
    /// * `name` - File name as shown to the user
    /// * `mime` - `File.type`, may be empty
    /// * `bytes` - File contents
    /// * `preview` - Object URL for the thumbnail, returned again on removal
    pub fn add_file(&self, name: String, mime: Option<String>, bytes: Vec<u8>, preview: Option<String>) -> u32 {
        let mut file = NewFile::new(name, bytes);
        if let Some(mime) = mime.filter(|m| !m.is_empty()) {
            file = file.with_mime(mime);
        }
        if let Some(preview) = preview {
            file = file.with_preview(preview);
        }

        self.list.borrow_mut().add_file(file).0
    }

    /// Remove one entry. Returns its preview URL so the caller can revoke it.
    pub fn remove(&self, id: u32) -> Option<String> {
        self.list
            .borrow_mut()
            .remove(EntryId(id))
            .and_then(|mut entry| entry.take_preview())
    }

    /// Remove every entry, returning all preview URLs to revoke.
    pub fn clear(&self) -> Vec<String> {
        self.list
            .borrow_mut()
            .clear()
            .into_iter()
            .filter_map(|mut entry| entry.take_preview())
            .collect()
    }

    /// Change an entry's output format (`jpeg`, `png` or `webp`).
    pub fn set_target_format(&self, id: u32, format: &str) -> Result<(), JsValue> {
        let format = parse_format(format)?;
        self.list
            .borrow_mut()
            .update_settings(EntryId(id), SettingsUpdate::format(format))
            .map_err(js_error)
    }

    /// Change an entry's quality; values are clamped to 1-100.
    pub fn set_quality(&self, id: u32, quality: f64) -> Result<(), JsValue> {
        self.list
            .borrow_mut()
            .update_settings(EntryId(id), SettingsUpdate::quality(quality_from_js(quality)))
            .map_err(js_error)
    }

    /// Snapshot of every entry (no byte buffers) for rendering.
    pub fn entries(&self) -> Result<JsValue, JsValue> {
        to_js(&self.list.borrow().summaries())
    }

    /// Encoded output of a completed entry.
    pub fn output(&self, id: u32) -> Option<Vec<u8>> {
        self.list
            .borrow()
            .get(EntryId(id))
            .and_then(|entry| entry.output().map(<[u8]>::to_vec))
    }

    /// Name the entry's output should be saved under.
    pub fn download_name(&self, id: u32) -> Option<String> {
        self.list.borrow().get(EntryId(id)).map(|entry| entry.download_name())
    }

    #[wasm_bindgen(getter)]
    pub fn has_completed(&self) -> bool {
        self.list.borrow().has_completed()
    }

    #[wasm_bindgen(getter)]
    pub fn is_processing(&self) -> bool {
        self.list.borrow().is_processing()
    }

    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.list.borrow().len()
    }

    /// Process one entry.
    ///
    /// # Returns
    ///
    /// A `Promise<boolean>` resolving to `true` when the entry completed. It
    /// rejects only when the id is unknown or already in flight.
    pub fn process(&self, id: u32) -> Promise {
        let job = self.list.borrow_mut().begin(EntryId(id));
        let list = Rc::clone(&self.list);
        let transcoder = Rc::clone(&self.transcoder);

        future_to_promise(async move {
            let job = job.map_err(js_error)?;
            let outcomes = run_jobs(transcoder.as_ref(), vec![job]).await;
            report_failures(&outcomes);

            let report = record_outcomes(&mut list.borrow_mut(), outcomes);
            Ok(JsValue::from_bool(report.completed == 1))
        })
    }

    /// Process every pending or failed entry concurrently.
    ///
    /// # Returns
    ///
    /// A `Promise<{ completed: number, failed: number }>`.
    pub fn process_all(&self) -> Promise {
        let jobs = self.list.borrow_mut().begin_batch();
        let list = Rc::clone(&self.list);
        let transcoder = Rc::clone(&self.transcoder);

        future_to_promise(async move {
            let outcomes = run_jobs(transcoder.as_ref(), jobs).await;
            report_failures(&outcomes);

            let report = record_outcomes(&mut list.borrow_mut(), outcomes);
            to_js(&report)
        })
    }

    /// Zip all completed outputs; save it under `archive_name()`.
    pub fn export_archive(&self) -> Result<Vec<u8>, JsValue> {
        self.list.borrow().export_archive().map_err(js_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("http://localhost:3000/api/process".to_string())
    }

    #[test]
    fn test_add_and_remove_returns_preview() {
        let s = session();
        let a = s.add_file("a.png".into(), Some("image/png".into()), vec![1], Some("blob:a".into()));
        let b = s.add_file("b.png".into(), Some(String::new()), vec![2], None);

        assert_eq!(s.len(), 2);
        assert_eq!(s.remove(a).as_deref(), Some("blob:a"));
        assert_eq!(s.remove(b), None);
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn test_empty_mime_is_ignored() {
        let s = session();
        let id = s.add_file("a.png".into(), Some(String::new()), vec![1], None);
        let list = s.list.borrow();
        assert_eq!(list.get(EntryId(id)).unwrap().mime(), None);
    }

    #[test]
    fn test_clear_returns_previews() {
        let s = session();
        s.add_file("a.png".into(), None, vec![1], Some("blob:a".into()));
        s.add_file("b.png".into(), None, vec![2], None);
        s.add_file("c.png".into(), None, vec![3], Some("blob:c".into()));

        assert_eq!(s.clear(), vec!["blob:a".to_string(), "blob:c".to_string()]);
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn test_download_name_and_output() {
        let s = session();
        let id = s.add_file("holiday.jpeg".into(), None, vec![1], None);
        assert_eq!(s.download_name(id).as_deref(), Some("compressed-holiday.webp"));
        assert_eq!(s.output(id), None);
        assert!(!s.has_completed());
        assert_eq!(s.download_name(999), None);
    }

    #[test]
    fn test_completed_output_visible() {
        let s = session();
        let id = s.add_file("a.png".into(), None, vec![1], None);
        {
            let mut list = s.list.borrow_mut();
            list.begin(EntryId(id)).unwrap();
            list.finish(JobOutcome {
                id: EntryId(id),
                result: Ok(vec![4, 5, 6]),
            });
        }

        assert!(s.has_completed());
        assert_eq!(s.output(id), Some(vec![4, 5, 6]));
    }
}
