// Copyright 2025 Cowboy AI, LLC.

//! LRU caching decorator for reference data lookups

use async_trait::async_trait;
use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;
use tracing::trace;

use super::{
    CodeDescription, CourtReferenceData, NationalityReferenceData, OffenceReferenceData,
    ProsecutorReferenceData, ReferenceDataQueryService,
};
use crate::errors::DomainResult;
use crate::reference_data::snapshot::normalise;

/// Code lists, cached whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CodeList {
    ObservedEthnicity,
    SelfDefinedEthnicity,
    CustodyStatus,
    SummonsCode,
}

/// Caches keyed lookups in bounded LRU caches and code lists until invalidated
///
/// Negative prosecutor/court answers are cached too; a new prosecutor is picked
/// up after [`CachedReferenceData::invalidate`].
pub struct CachedReferenceData<S> {
    inner: S,
    offences: Mutex<LruCache<String, Vec<OffenceReferenceData>>>,
    prosecutors: Mutex<LruCache<String, Option<ProsecutorReferenceData>>>,
    courts: Mutex<LruCache<String, Option<CourtReferenceData>>>,
    nationalities: Mutex<Option<Vec<NationalityReferenceData>>>,
    code_lists: Mutex<LruCache<CodeList, Vec<CodeDescription>>>,
}

impl<S: ReferenceDataQueryService> CachedReferenceData<S> {
    /// Wrap a service with caches of the given capacity per lookup kind
    pub fn new(inner: S, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            offences: Mutex::new(LruCache::new(capacity)),
            prosecutors: Mutex::new(LruCache::new(capacity)),
            courts: Mutex::new(LruCache::new(capacity)),
            nationalities: Mutex::new(None),
            code_lists: Mutex::new(LruCache::new(
                NonZeroUsize::new(4).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    /// The wrapped service
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached answer
    pub async fn invalidate(&self) {
        self.offences.lock().await.clear();
        self.prosecutors.lock().await.clear();
        self.courts.lock().await.clear();
        *self.nationalities.lock().await = None;
        self.code_lists.lock().await.clear();
    }

    async fn code_list<F, Fut>(&self, kind: CodeList, load: F) -> DomainResult<Vec<CodeDescription>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = DomainResult<Vec<CodeDescription>>>,
    {
        if let Some(hit) = self.code_lists.lock().await.get(&kind).cloned() {
            trace!(?kind, "Code list cache hit");
            return Ok(hit);
        }
        let loaded = load().await?;
        self.code_lists.lock().await.put(kind, loaded.clone());
        Ok(loaded)
    }
}

async fn cached<K, V, Fut>(cache: &Mutex<LruCache<K, V>>, key: K, load: Fut) -> DomainResult<V>
where
    K: Hash + Eq + std::fmt::Debug,
    V: Clone,
    Fut: std::future::Future<Output = DomainResult<V>>,
{
    if let Some(hit) = cache.lock().await.get(&key).cloned() {
        trace!(?key, "Reference data cache hit");
        return Ok(hit);
    }
    trace!(?key, "Reference data cache miss");
    let value = load.await?;
    cache.lock().await.put(key, value.clone());
    Ok(value)
}

#[async_trait]
impl<S: ReferenceDataQueryService> ReferenceDataQueryService for CachedReferenceData<S> {
    async fn offences_by_cjs_code(
        &self,
        cjs_code: &str,
    ) -> DomainResult<Vec<OffenceReferenceData>> {
        cached(
            &self.offences,
            normalise(cjs_code),
            self.inner.offences_by_cjs_code(cjs_code),
        )
        .await
    }

    async fn prosecutor_by_ou_code(
        &self,
        ou_code: &str,
    ) -> DomainResult<Option<ProsecutorReferenceData>> {
        cached(
            &self.prosecutors,
            normalise(ou_code),
            self.inner.prosecutor_by_ou_code(ou_code),
        )
        .await
    }

    async fn court_by_ou_code(&self, ou_code: &str) -> DomainResult<Option<CourtReferenceData>> {
        cached(
            &self.courts,
            normalise(ou_code),
            self.inner.court_by_ou_code(ou_code),
        )
        .await
    }

    async fn nationalities(&self) -> DomainResult<Vec<NationalityReferenceData>> {
        if let Some(hit) = self.nationalities.lock().await.clone() {
            return Ok(hit);
        }
        let loaded = self.inner.nationalities().await?;
        *self.nationalities.lock().await = Some(loaded.clone());
        Ok(loaded)
    }

    async fn observed_ethnicities(&self) -> DomainResult<Vec<CodeDescription>> {
        self.code_list(CodeList::ObservedEthnicity, || {
            self.inner.observed_ethnicities()
        })
        .await
    }

    async fn self_defined_ethnicities(&self) -> DomainResult<Vec<CodeDescription>> {
        self.code_list(CodeList::SelfDefinedEthnicity, || {
            self.inner.self_defined_ethnicities()
        })
        .await
    }

    async fn custody_statuses(&self) -> DomainResult<Vec<CodeDescription>> {
        self.code_list(CodeList::CustodyStatus, || self.inner.custody_statuses())
            .await
    }

    async fn summons_codes(&self) -> DomainResult<Vec<CodeDescription>> {
        self.code_list(CodeList::SummonsCode, || self.inner.summons_codes())
            .await
    }
}
