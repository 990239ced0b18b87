use super::{GoalPriority, GoalTemplate};
use crate::dignometro::dimension::Dimension;

struct Entry {
    dimension: Dimension,
    title: &'static str,
    question: &'static str,
    priority: GoalPriority,
}

const fn entry(
    dimension: Dimension,
    title: &'static str,
    question: &'static str,
    priority: GoalPriority,
) -> Entry {
    Entry {
        dimension,
        title,
        question,
        priority,
    }
}

// Ordered most severe first within each dimension.
const BUNDLED: &[Entry] = &[
    // Água
    entry(
        Dimension::Agua,
        "Garantir acesso à água potável",
        "A família tem acesso diário a água tratada para beber e cozinhar?",
        GoalPriority::Critical,
    ),
    entry(
        Dimension::Agua,
        "Instalar reservatório de água",
        "Existe caixa d'água ou reservatório tampado na residência?",
        GoalPriority::High,
    ),
    entry(
        Dimension::Agua,
        "Adotar filtragem da água",
        "A água consumida é filtrada ou fervida antes do uso?",
        GoalPriority::Medium,
    ),
    // Saneamento
    entry(
        Dimension::Saneamento,
        "Ter banheiro dentro de casa",
        "A residência possui banheiro de uso exclusivo da família?",
        GoalPriority::Critical,
    ),
    entry(
        Dimension::Saneamento,
        "Conectar à rede de esgoto",
        "O esgoto da casa está ligado à rede pública ou a uma fossa séptica?",
        GoalPriority::High,
    ),
    entry(
        Dimension::Saneamento,
        "Organizar descarte de lixo",
        "O lixo é recolhido pela coleta pública ao menos uma vez por semana?",
        GoalPriority::Medium,
    ),
    // Saúde
    entry(
        Dimension::Saude,
        "Cadastrar a família na UBS",
        "Todos os membros estão cadastrados na Unidade Básica de Saúde?",
        GoalPriority::Critical,
    ),
    entry(
        Dimension::Saude,
        "Atualizar a carteira de vacinação",
        "As vacinas de crianças e adultos estão em dia?",
        GoalPriority::High,
    ),
    entry(
        Dimension::Saude,
        "Fazer consultas preventivas",
        "Algum membro fez consulta preventiva nos últimos doze meses?",
        GoalPriority::Medium,
    ),
    // Educação
    entry(
        Dimension::Educacao,
        "Matricular todas as crianças na escola",
        "Todas as crianças de 4 a 17 anos estão matriculadas?",
        GoalPriority::Critical,
    ),
    entry(
        Dimension::Educacao,
        "Acompanhar a frequência escolar",
        "As crianças frequentam a escola regularmente?",
        GoalPriority::High,
    ),
    entry(
        Dimension::Educacao,
        "Concluir a escolarização dos adultos",
        "Os adultos da família concluíram o ensino fundamental?",
        GoalPriority::Low,
    ),
    // Moradia
    entry(
        Dimension::Moradia,
        "Regularizar a situação da moradia",
        "A família tem segurança de que não será removida da residência?",
        GoalPriority::Critical,
    ),
    entry(
        Dimension::Moradia,
        "Reparar a estrutura da casa",
        "O telhado, paredes e piso estão em boas condições?",
        GoalPriority::High,
    ),
    entry(
        Dimension::Moradia,
        "Reduzir o adensamento",
        "Há no máximo três pessoas por dormitório?",
        GoalPriority::Medium,
    ),
    // Alimentação
    entry(
        Dimension::Alimentacao,
        "Garantir três refeições diárias",
        "Todos os membros fazem ao menos três refeições por dia?",
        GoalPriority::Critical,
    ),
    entry(
        Dimension::Alimentacao,
        "Acessar programas de alimentação",
        "A família recebe os benefícios alimentares a que tem direito?",
        GoalPriority::High,
    ),
    entry(
        Dimension::Alimentacao,
        "Diversificar a alimentação",
        "A família consome frutas, verduras e proteínas durante a semana?",
        GoalPriority::Medium,
    ),
    // Renda estável
    entry(
        Dimension::RendaEstavel,
        "Conquistar uma fonte de renda regular",
        "Algum adulto tem trabalho ou benefício com pagamento mensal garantido?",
        GoalPriority::Critical,
    ),
    entry(
        Dimension::RendaEstavel,
        "Formalizar o trabalho",
        "O trabalho principal possui carteira assinada ou registro como MEI?",
        GoalPriority::High,
    ),
    entry(
        Dimension::RendaEstavel,
        "Planejar o orçamento mensal",
        "A família anota entradas e saídas de dinheiro do mês?",
        GoalPriority::Medium,
    ),
    // Renda diversificada
    entry(
        Dimension::RendaDiversificada,
        "Criar uma segunda fonte de renda",
        "A família possui mais de uma fonte de renda?",
        GoalPriority::High,
    ),
    entry(
        Dimension::RendaDiversificada,
        "Fazer um curso de qualificação",
        "Algum adulto fez curso profissionalizante no último ano?",
        GoalPriority::Medium,
    ),
    entry(
        Dimension::RendaDiversificada,
        "Envolver mais adultos na renda",
        "Mais de um adulto contribui para a renda da casa?",
        GoalPriority::Low,
    ),
    // Poupança
    entry(
        Dimension::Poupanca,
        "Quitar dívidas em atraso",
        "A família está sem dívidas em atraso?",
        GoalPriority::High,
    ),
    entry(
        Dimension::Poupanca,
        "Abrir uma conta de poupança",
        "A família possui conta bancária ou poupança?",
        GoalPriority::Medium,
    ),
    entry(
        Dimension::Poupanca,
        "Montar uma reserva de emergência",
        "Existe dinheiro guardado para cobrir um mês de despesas?",
        GoalPriority::Low,
    ),
    // Bens e conectividade
    entry(
        Dimension::BensConectividade,
        "Ter acesso à internet",
        "A família tem acesso à internet em casa ou pelo celular?",
        GoalPriority::High,
    ),
    entry(
        Dimension::BensConectividade,
        "Adquirir eletrodomésticos essenciais",
        "A casa possui geladeira e fogão em funcionamento?",
        GoalPriority::Medium,
    ),
    entry(
        Dimension::BensConectividade,
        "Incluir os adultos digitalmente",
        "Os adultos conseguem usar serviços públicos pelo celular?",
        GoalPriority::Low,
    ),
];

/// Template ids are `<dimension>_<n>` with `n` counted from 1 per dimension.
pub(super) fn bundled_templates() -> Vec<GoalTemplate> {
    let mut counters = [0usize; Dimension::ALL.len()];

    BUNDLED
        .iter()
        .map(|entry| {
            let counter = &mut counters[entry.dimension.position()];
            *counter += 1;
            GoalTemplate {
                id: format!("{}_{}", entry.dimension.key(), counter),
                dimension: entry.dimension,
                title: entry.title.to_string(),
                question: entry.question.to_string(),
                priority: entry.priority,
            }
        })
        .collect()
}
