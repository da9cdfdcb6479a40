//! Named EnsEMBL endpoints and their URL templates.
//!
//! # Design
//! The built-in table is declared once in the `endpoints!` invocation below.
//! The same declaration produces the static `(name, method, template)` list
//! and one convenience method per endpoint on [`EnsemblClient`], so the two
//! cannot drift apart. Custom tables loaded with [`Registry::from_json`] are
//! only reachable through [`EnsemblClient::invoke`] and
//! [`EnsemblClient::operation`].
//!
//! Methods are stored as configured text and validated when a call is made,
//! so a bad entry only breaks its own operation.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::client::EnsemblClient;
use crate::error::{Error, Result};
use crate::http::HttpMethod;
use crate::template;

/// A named remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Endpoint {
    #[serde(skip)]
    pub name: String,
    pub method: String,
    pub url: String,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            url: url.into(),
        }
    }

    /// The configured method, or `InvalidMethod` if it is not GET or POST.
    pub fn http_method(&self) -> Result<HttpMethod> {
        HttpMethod::parse(&self.method).ok_or_else(|| Error::InvalidMethod {
            operation: self.name.clone(),
            method: self.method.clone(),
        })
    }

    /// Placeholder names in the URL template, in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        template::placeholders(&self.url).collect()
    }
}

/// Immutable lookup table from operation name to [`Endpoint`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    endpoints: BTreeMap<String, Endpoint>,
}

impl Registry {
    /// The built-in EnsEMBL REST table.
    pub fn ensembl() -> Self {
        ENSEMBL_ENDPOINTS
            .iter()
            .map(|(name, method, url)| Endpoint::new(*name, *method, *url))
            .collect()
    }

    /// Load a table shaped as `{"name": {"method": "GET", "url": "/x/{{id}}"}}`.
    ///
    /// Every `url` must be an absolute path (leading `/`) with no query or
    /// fragment; it is appended to the server URL.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: BTreeMap<String, Endpoint> =
            serde_json::from_str(json).map_err(|e| Error::InvalidRegistry(e.to_string()))?;
        if let Some(name) = table.keys().find(|name| name.is_empty()) {
            return Err(Error::InvalidRegistry(format!("empty operation name {name:?}")));
        }
        if let Some((name, endpoint)) = table
            .iter()
            .find(|(_, e)| !e.url.starts_with('/') || e.url.contains(['?', '#']))
        {
            return Err(Error::InvalidRegistry(format!(
                "operation {name}: url {:?} is not an absolute path",
                endpoint.url
            )));
        }
        Ok(table
            .into_iter()
            .map(|(name, endpoint)| Endpoint { name, ..endpoint })
            .collect())
    }

    /// Find an operation by name.
    pub fn lookup(&self, name: &str) -> Result<&Endpoint> {
        self.endpoints
            .get(name)
            .ok_or_else(|| Error::UnknownOperation(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.endpoints.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl FromIterator<Endpoint> for Registry {
    fn from_iter<I: IntoIterator<Item = Endpoint>>(iter: I) -> Self {
        Self {
            endpoints: iter.into_iter().map(|e| (e.name.clone(), e)).collect(),
        }
    }
}

macro_rules! endpoints {
    ($($name:ident => $method:literal $url:literal;)*) => {
        const ENSEMBL_ENDPOINTS: &[(&str, &str, &str)] = &[$((stringify!($name), $method, $url)),*];

        impl EnsemblClient {
            $(
                #[doc = concat!("`", $method, " ", $url, "`")]
                pub fn $name(&self, params: &crate::Params) -> Result<crate::Reply> {
                    self.invoke(stringify!($name), params)
                }
            )*
        }
    };
}

endpoints! {
    // Archive
    archive_id => "GET" "/archive/id/{{id}}";
    archive_id_post => "POST" "/archive/id";

    // Comparative genomics
    cafe_tree => "GET" "/cafe/genetree/id/{{id}}";
    cafe_tree_member_id => "GET" "/cafe/genetree/member/id/{{species}}/{{id}}";
    cafe_tree_member_symbol => "GET" "/cafe/genetree/member/symbol/{{species}}/{{symbol}}";
    genetree => "GET" "/genetree/id/{{id}}";
    genetree_member_id => "GET" "/genetree/member/id/{{species}}/{{id}}";
    genetree_member_symbol => "GET" "/genetree/member/symbol/{{species}}/{{symbol}}";
    genomic_alignment_region => "GET" "/alignment/region/{{species}}/{{region}}";
    homology_ensemblgene => "GET" "/homology/id/{{species}}/{{id}}";
    homology_symbol => "GET" "/homology/symbol/{{species}}/{{symbol}}";

    // Cross references
    xref_external => "GET" "/xrefs/symbol/{{species}}/{{symbol}}";
    xref_id => "GET" "/xrefs/id/{{id}}";
    xref_name => "GET" "/xrefs/name/{{species}}/{{name}}";

    // Information
    analysis => "GET" "/info/analysis/{{species}}";
    assembly_info => "GET" "/info/assembly/{{species}}";
    assembly_stats => "GET" "/info/assembly/{{species}}/{{region_name}}";
    biotypes => "GET" "/info/biotypes/{{species}}";
    biotypes_groups => "GET" "/info/biotypes/groups/{{group}}/{{object_type}}";
    biotypes_name => "GET" "/info/biotypes/name/{{name}}/{{object_type}}";
    compara_methods => "GET" "/info/compara/methods";
    compara_species_sets => "GET" "/info/compara/species_sets/{{method}}";
    comparas => "GET" "/info/comparas";
    data => "GET" "/info/data";
    eg_version => "GET" "/info/eg_version";
    external_dbs => "GET" "/info/external_dbs/{{species}}";
    info_divisions => "GET" "/info/divisions";
    info_genome => "GET" "/info/genomes/{{name}}";
    info_genomes_accession => "GET" "/info/genomes/accession/{{accession}}";
    info_genomes_assembly => "GET" "/info/genomes/assembly/{{assembly_id}}";
    info_genomes_division => "GET" "/info/genomes/division/{{division}}";
    info_genomes_taxonomy => "GET" "/info/genomes/taxonomy/{{taxon_name}}";
    ping => "GET" "/info/ping";
    rest => "GET" "/info/rest";
    software => "GET" "/info/software";
    species => "GET" "/info/species";
    variation => "GET" "/info/variation/{{species}}";
    variation_consequence_types => "GET" "/info/variation/consequence_types";
    variation_population_name => "GET" "/info/variation/populations/{{species}}/{{population_name}}";
    variation_populations => "GET" "/info/variation/populations/{{species}}";

    // Linkage disequilibrium
    ld_id_get => "GET" "/ld/{{species}}/{{id}}/{{population_name}}";
    ld_pairwise_get => "GET" "/ld/{{species}}/pairwise/{{id1}}/{{id2}}";
    ld_region_get => "GET" "/ld/{{species}}/region/{{region}}/{{population_name}}";

    // Lookup
    lookup_id => "GET" "/lookup/id/{{id}}";
    lookup_id_post => "POST" "/lookup/id";
    lookup_symbol => "GET" "/lookup/symbol/{{species}}/{{symbol}}";
    lookup_symbol_post => "POST" "/lookup/symbol/{{species}}";

    // Mapping
    assembly_cdna => "GET" "/map/cdna/{{id}}/{{region}}";
    assembly_cds => "GET" "/map/cds/{{id}}/{{region}}";
    assembly_map => "GET" "/map/{{species}}/{{asm_one}}/{{region}}/{{asm_two}}";
    assembly_translation => "GET" "/map/translation/{{id}}/{{region}}";

    // Ontologies and taxonomy
    ontology_ancestors => "GET" "/ontology/ancestors/{{id}}";
    ontology_ancestors_chart => "GET" "/ontology/ancestors/chart/{{id}}";
    ontology_descendants => "GET" "/ontology/descendants/{{id}}";
    ontology_id => "GET" "/ontology/id/{{id}}";
    ontology_name => "GET" "/ontology/name/{{name}}";
    taxonomy_classification => "GET" "/taxonomy/classification/{{id}}";
    taxonomy_id => "GET" "/taxonomy/id/{{id}}";
    taxonomy_name => "GET" "/taxonomy/name/{{name}}";

    // Overlap
    overlap_id => "GET" "/overlap/id/{{id}}";
    overlap_region => "GET" "/overlap/region/{{species}}/{{region}}";
    overlap_translation => "GET" "/overlap/translation/{{id}}";

    // Phenotype annotations
    phenotype_accession => "GET" "/phenotype/accession/{{species}}/{{accession}}";
    phenotype_gene => "GET" "/phenotype/gene/{{species}}/{{gene}}";
    phenotype_region => "GET" "/phenotype/region/{{species}}/{{region}}";
    phenotype_term => "GET" "/phenotype/term/{{species}}/{{term}}";

    // Regulation
    regulatory_id => "GET" "/regulatory/species/{{species}}/id/{{id}}";
    species_binding_matrix => "GET" "/species/{{species}}/binding_matrix/{{binding_matrix}}";

    // Sequence
    sequence_id => "GET" "/sequence/id/{{id}}";
    sequence_id_post => "POST" "/sequence/id";
    sequence_region => "GET" "/sequence/region/{{species}}/{{region}}";
    sequence_region_post => "POST" "/sequence/region/{{species}}";

    // Transcript haplotypes
    transcript_haplotypes_get => "GET" "/transcript_haplotypes/{{species}}/{{id}}";

    // Variation
    variant_recoder => "GET" "/variant_recoder/{{species}}/{{id}}";
    variant_recoder_post => "POST" "/variant_recoder/{{species}}";
    variation_id => "GET" "/variation/{{species}}/{{id}}";
    variation_pmcid_get => "GET" "/variation/{{species}}/pmcid/{{pmcid}}";
    variation_pmid_get => "GET" "/variation/{{species}}/pmid/{{pmid}}";
    variation_post => "POST" "/variation/{{species}}";

    // Variant effect predictor
    vep_hgvs_get => "GET" "/vep/{{species}}/hgvs/{{hgvs_notation}}";
    vep_hgvs_post => "POST" "/vep/{{species}}/hgvs";
    vep_id_get => "GET" "/vep/{{species}}/id/{{id}}";
    vep_id_post => "POST" "/vep/{{species}}/id";
    vep_region_get => "GET" "/vep/{{species}}/region/{{region}}/{{allele}}";
    vep_region_post => "POST" "/vep/{{species}}/region";
}
