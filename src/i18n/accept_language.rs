// src/i18n/accept_language.rs

/// Um segmento do cabeçalho `Accept-Language`: a tag e o seu peso `q`.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
    pub tag: String,
    pub quality: f64,
}

/// Tags ordenadas da mais para a menos preferida.
/// Pode conter duplicados: o resolvedor usa a primeira ocorrência.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedLocaleList(Vec<String>);

impl RankedLocaleList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RankedLocaleList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// Conjunto de entradas com o mesmo peso, na ordem original do cabeçalho
struct Tier<'a> {
    tags: Vec<&'a str>,
}

impl Tier<'_> {
    // "en-US" -> ["en-US", "en"]; a base herda a posição da tag completa
    fn expand(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().flat_map(|tag| {
            let base = tag
                .split_once('-')
                .map(|(base, _region)| base)
                .filter(|base| !base.is_empty());
            std::iter::once(*tag).chain(base)
        })
    }
}

/// Lê os segmentos do cabeçalho sem ordenar.
///
/// Segmentos sem tag são descartados (com o peso). Peso ausente, vazio ou
/// não numérico vira `1.0`; valores fora de `[0,1]` passam como estão.
pub fn parse_language_ranges(header: &str) -> Vec<LanguageRange> {
    header
        .split(',')
        .filter_map(|segment| {
            let mut params = segment.split(';');
            let tag = params.next().unwrap_or_default().trim();
            if tag.is_empty() {
                return None;
            }

            let quality = params
                .find_map(|param| param.trim().strip_prefix("q="))
                .and_then(|q| q.trim().parse::<f64>().ok())
                .filter(|q| q.is_finite())
                .unwrap_or(1.0);

            Some(LanguageRange {
                tag: tag.to_string(),
                quality,
            })
        })
        .collect()
}

/// Converte o cabeçalho `Accept-Language` numa lista ordenada de tags.
///
/// Ordem: peso decrescente, empates pela ordem do cabeçalho. Cada tag com
/// região é seguida pela sua língua base, no mesmo nível de peso.
/// Nunca falha: entrada inválida resulta em lista vazia ou parcial.
pub fn parse_accept_language(header: &str) -> RankedLocaleList {
    let mut ranges = parse_language_ranges(header);
    // sort_by é estável: empates mantêm a ordem original
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));

    let mut tiers: Vec<Tier<'_>> = Vec::new();
    let mut current_quality = None;
    for range in &ranges {
        if current_quality != Some(range.quality) {
            current_quality = Some(range.quality);
            tiers.push(Tier { tags: Vec::new() });
        }
        if let Some(tier) = tiers.last_mut() {
            tier.tags.push(&range.tag);
        }
    }

    tiers.iter().flat_map(Tier::expand).collect()
}
