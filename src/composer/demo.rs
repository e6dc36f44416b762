//! Sample prospects for trying the composer without real research

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoProspect {
    pub name: &'static str,
    pub company: &'static str,
    pub title: &'static str,
    pub details: &'static str,
}

pub const DEMO_PROSPECTS: [DemoProspect; 4] = [
    DemoProspect {
        name: "Sarah Chen",
        company: "InnovateTech",
        title: "VP of Marketing",
        details: "Sarah Chen runs marketing at InnovateTech, a fast growing SaaS company building AI products. \
                  Her latest blog post, \"The Future of AI in Marketing Automation\", argues that automated customer \
                  conversations need to feel more personal and more human. She posts regularly on LinkedIn about \
                  marketing trends and leadership, and her bio says she cares about mentorship and sustainable tech.",
    },
    DemoProspect {
        name: "Alex Rodriguez",
        company: "QuantumLeap",
        title: "Head of Growth",
        details: "Alex Rodriguez leads growth at QuantumLeap, a predictive analytics startup. He was a guest on a \
                  podcast last month talking about how hard it is to scale data infrastructure, and he pushes data \
                  driven strategies for finding product market fit. QuantumLeap just closed its Series A and is \
                  growing the engineering team.",
    },
    DemoProspect {
        name: "Dr. Emily Carter",
        company: "BioGenetics Inc.",
        title: "CTO",
        details: "Dr. Emily Carter is CTO at BioGenetics Inc., a genomic research firm. She published a paper on \
                  what CRISPR technology means for modern medicine, is well regarded in academic circles, and speaks \
                  often at biotech conferences. Her team wants to speed up its research data processing pipeline.",
    },
    DemoProspect {
        name: "Michael B. Jordan",
        company: "Nexus Solutions",
        title: "Senior Sales Director",
        details: "Michael B. Jordan is a Senior Sales Director at Nexus Solutions, which sells cybersecurity \
                  to financial institutions. He posted on LinkedIn about the growing wave of phishing attacks against \
                  banks. He wants new ways to protect his clients and has shown interest in AI driven security \
                  platforms.",
    },
];

/// Pick one demo prospect at random
pub fn random_prospect() -> &'static DemoProspect {
    let mut buf = [0u8; 1];
    if let Err(e) = getrandom::fill(&mut buf) {
        tracing::debug!("No randomness available, using first demo prospect: {}", e);
        return &DEMO_PROSPECTS[0];
    }
    &DEMO_PROSPECTS[buf[0] as usize % DEMO_PROSPECTS.len()]
}
