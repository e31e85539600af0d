//! Metadata provider contract
use crate::data_model::{MovieDetail, PersonDetail, PersonHit, PersonSection};
use crate::error::ProviderError;
use crate::ids::{PersonId, TitleId};

/// Person and title lookups the pipeline depends on.
///
/// Calls are blocking; one instance serves a whole invocation and is passed
/// to each stage that needs it.
pub trait MetadataProvider {
    /// Search people by name, in the provider's relevance order
    fn search_person(&self, name: &str) -> Result<Vec<PersonHit>, ProviderError>;

    /// Person record, with the requested information sets filled in
    fn get_person(
        &self,
        id: &PersonId,
        sections: &[PersonSection],
    ) -> Result<PersonDetail, ProviderError>;

    /// Detail for one title
    fn get_movie(&self, id: &TitleId) -> Result<MovieDetail, ProviderError>;
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for &P {
    fn search_person(&self, name: &str) -> Result<Vec<PersonHit>, ProviderError> {
        (**self).search_person(name)
    }

    fn get_person(
        &self,
        id: &PersonId,
        sections: &[PersonSection],
    ) -> Result<PersonDetail, ProviderError> {
        (**self).get_person(id, sections)
    }

    fn get_movie(&self, id: &TitleId) -> Result<MovieDetail, ProviderError> {
        (**self).get_movie(id)
    }
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for Box<P> {
    fn search_person(&self, name: &str) -> Result<Vec<PersonHit>, ProviderError> {
        (**self).search_person(name)
    }

    fn get_person(
        &self,
        id: &PersonId,
        sections: &[PersonSection],
    ) -> Result<PersonDetail, ProviderError> {
        (**self).get_person(id, sections)
    }

    fn get_movie(&self, id: &TitleId) -> Result<MovieDetail, ProviderError> {
        (**self).get_movie(id)
    }
}
