use super::cancel::CancelFlag;
use super::info::{SearchInfo, SearchIter, SearchRoot};
use super::listener::SearchListener;
use super::options::SearchScopeOptions;
use crate::fs::FileObject;
use anyhow::Result;
use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::sync::Arc;

/// Several search infos searched one after another
#[derive(Default, Clone)]
pub struct CompoundSearchInfo {
    elements: Vec<Arc<dyn SearchInfo>>,
}

impl CompoundSearchInfo {
    pub fn new(elements: Vec<Arc<dyn SearchInfo>>) -> Self {
        Self { elements }
    }

    pub fn push(&mut self, element: Arc<dyn SearchInfo>) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl SearchInfo for CompoundSearchInfo {
    fn can_search(&self) -> bool {
        self.elements.iter().any(|e| e.can_search())
    }

    fn search_roots(&self) -> Vec<SearchRoot> {
        self.elements.iter().flat_map(|e| e.search_roots()).collect()
    }

    fn files_to_search(
        &self,
        options: &SearchScopeOptions,
        listener: Arc<dyn SearchListener>,
        cancel: &CancelFlag,
    ) -> Result<SearchIter> {
        // Surface a bad pattern now rather than once per element
        options.file_name_matcher()?;

        let searchable: VecDeque<Arc<dyn SearchInfo>> = self
            .elements
            .iter()
            .filter(|e| e.can_search())
            .cloned()
            .collect();
        tracing::debug!(
            "Compound search over {} of {} element(s)",
            searchable.len(),
            self.elements.len()
        );

        Ok(Box::new(CompoundSearchIterator {
            pending: searchable,
            current: None,
            options: options.clone(),
            listener,
            cancel: cancel.clone(),
            next: None,
        }))
    }
}

/// Exhausts the element iterators left to right
///
/// An element's iterator is created only once the previous one is done;
/// elements that produce nothing are passed over. After cancellation no
/// further element is started.
pub struct CompoundSearchIterator {
    pending: VecDeque<Arc<dyn SearchInfo>>,
    current: Option<SearchIter>,
    options: SearchScopeOptions,
    listener: Arc<dyn SearchListener>,
    cancel: CancelFlag,
    next: Option<FileObject>,
}

impl CompoundSearchIterator {
    /// Whether another file is available. Finds and caches it if needed.
    pub fn has_next(&mut self) -> bool {
        while self.next.is_none() {
            if let Some(current) = self.current.as_mut() {
                match current.next() {
                    Some(file) => {
                        self.next = Some(file);
                        break;
                    }
                    None => self.current = None,
                }
            }

            if self.cancel.is_cancelled() {
                self.pending.clear();
                break;
            }
            let Some(element) = self.pending.pop_front() else {
                break;
            };
            match element.files_to_search(&self.options, self.listener.clone(), &self.cancel) {
                Ok(iter) => self.current = Some(iter),
                Err(e) => self.listener.general_error(&e),
            }
        }
        self.next.is_some()
    }
}

impl Iterator for CompoundSearchIterator {
    type Item = FileObject;

    fn next(&mut self) -> Option<FileObject> {
        if self.has_next() {
            self.next.take()
        } else {
            None
        }
    }
}

impl FusedIterator for CompoundSearchIterator {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{FileKind, Location};
    use crate::search::listener::{NoopListener, SearchStats};
    use std::sync::Mutex;

    /// Fixed list of files; records when its iterator is created
    struct Fixed {
        id: &'static str,
        files: Vec<&'static str>,
        searchable: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl SearchInfo for Fixed {
        fn can_search(&self) -> bool {
            self.searchable
        }

        fn search_roots(&self) -> Vec<SearchRoot> {
            let path = format!("/{}", self.id);
            let location = Location::Virtual(path.clone());
            let file = FileObject::new(self.id, path, FileKind::Folder, location);
            vec![SearchRoot::new(file)]
        }

        fn files_to_search(
            &self,
            _: &SearchScopeOptions,
            _: Arc<dyn SearchListener>,
            _: &CancelFlag,
        ) -> Result<SearchIter> {
            self.log.lock().unwrap().push(format!("start {}", self.id));
            let files: Vec<FileObject> = self
                .files
                .iter()
                .map(|p| FileObject::new(*p, *p, FileKind::Data, Location::Virtual(p.to_string())))
                .collect();
            Ok(Box::new(files.into_iter()))
        }
    }

    fn element(
        id: &'static str,
        files: Vec<&'static str>,
        searchable: bool,
        log: &Arc<Mutex<Vec<String>>>,
    ) -> Arc<dyn SearchInfo> {
        Arc::new(Fixed {
            id,
            files,
            searchable,
            log: log.clone(),
        })
    }

    #[test]
    fn test_left_to_right_and_lazy() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let compound = CompoundSearchInfo::new(vec![
            element("a", vec!["/a/1"], true, &log),
            element("b", vec![], true, &log),
            element("c", vec!["/c/1", "/c/2"], true, &log),
        ]);

        let mut iter = compound
            .files_to_search(&SearchScopeOptions::new(), Arc::new(NoopListener), &CancelFlag::new())
            .unwrap();
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(iter.next().unwrap().path(), "/a/1");
        assert_eq!(*log.lock().unwrap(), vec!["start a"]);

        let rest: Vec<String> = iter.map(|f| f.path().to_string()).collect();
        assert_eq!(rest, vec!["/c/1", "/c/2"]);
        assert_eq!(*log.lock().unwrap(), vec!["start a", "start b", "start c"]);
    }

    #[test]
    fn test_non_searchable_elements_dropped() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let compound = CompoundSearchInfo::new(vec![
            element("gone", vec!["/gone/x"], false, &log),
            element("ok", vec!["/ok/y"], true, &log),
        ]);
        assert!(compound.can_search());
        assert_eq!(compound.search_roots().len(), 2);

        let files: Vec<String> = compound
            .files_to_search(&SearchScopeOptions::new(), Arc::new(NoopListener), &CancelFlag::new())
            .unwrap()
            .map(|f| f.path().to_string())
            .collect();
        assert_eq!(files, vec!["/ok/y"]);
        assert_eq!(*log.lock().unwrap(), vec!["start ok"]);
    }

    #[test]
    fn test_nothing_searchable() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let compound = CompoundSearchInfo::new(vec![element("gone", vec!["/gone/x"], false, &log)]);
        assert!(!compound.can_search());
        let mut iter = compound
            .files_to_search(&SearchScopeOptions::new(), Arc::new(NoopListener), &CancelFlag::new())
            .unwrap();
        assert!(iter.next().is_none());
        assert!(CompoundSearchInfo::default().files_to_search(
            &SearchScopeOptions::new(),
            Arc::new(NoopListener),
            &CancelFlag::new()
        ).unwrap().next().is_none());
    }

    #[test]
    fn test_cancel_stops_at_element_boundary() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let compound = CompoundSearchInfo::new(vec![
            element("a", vec!["/a/1"], true, &log),
            element("b", vec!["/b/1"], true, &log),
        ]);
        let cancel = CancelFlag::new();
        let mut iter = compound
            .files_to_search(&SearchScopeOptions::new(), Arc::new(NoopListener), &cancel)
            .unwrap();

        assert_eq!(iter.next().unwrap().path(), "/a/1");
        cancel.cancel();
        assert!(iter.next().is_none());
        assert_eq!(*log.lock().unwrap(), vec!["start a"]);
    }

    /// Element whose iterator cannot be created
    struct Broken;

    impl SearchInfo for Broken {
        fn can_search(&self) -> bool {
            true
        }

        fn search_roots(&self) -> Vec<SearchRoot> {
            Vec::new()
        }

        fn files_to_search(
            &self,
            _: &SearchScopeOptions,
            _: Arc<dyn SearchListener>,
            _: &CancelFlag,
        ) -> Result<SearchIter> {
            anyhow::bail!("root vanished")
        }
    }

    #[test]
    fn test_failing_element_reported_and_passed_over() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let compound = CompoundSearchInfo::new(vec![
            Arc::new(Broken) as Arc<dyn SearchInfo>,
            element("ok", vec!["/ok/y"], true, &log),
        ]);
        let stats = Arc::new(SearchStats::new());

        let files: Vec<String> = compound
            .files_to_search(&SearchScopeOptions::new(), stats.clone(), &CancelFlag::new())
            .unwrap()
            .map(|f| f.path().to_string())
            .collect();
        assert_eq!(files, vec!["/ok/y"]);
        assert_eq!(stats.snapshot().errors, 1);
        assert_eq!(*log.lock().unwrap(), vec!["start ok"]);
    }

    #[test]
    fn test_invalid_pattern_fails_up_front() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let compound = CompoundSearchInfo::new(vec![element("a", vec!["/a/1"], true, &log)]);
        let options = SearchScopeOptions::new().with_pattern("(").with_regexp(true);

        assert!(compound
            .files_to_search(&options, Arc::new(NoopListener), &CancelFlag::new())
            .is_err());
        assert!(log.lock().unwrap().is_empty());
    }
}
